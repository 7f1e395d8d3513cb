//! Form binding for method calls.
//!
//! A [`MethodForm`] holds the raw input of one method's arguments, the
//! validation errors mirroring it, and the outcome of the last call. It is
//! written once against [`sonde_ir::ValueEngine`] and works for either IDL
//! family.

mod form;
pub mod input_tree;

use sonde_ir::{BytesEncoding, BytesError, ErrorTree, RawValue};
use thiserror::Error;

pub use form::{CallMode, Caller, FormState, MethodForm, MethodSignature};

/// Why a form operation was refused.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FormError {
    #[error("a call to `{0}` is already in flight")]
    InFlight(String),
    #[error("invalid arguments: {0}")]
    Invalid(ErrorTree),
    #[error("no input at `{0}`")]
    UnknownPath(String),
    #[error("`{0}` is not a sequence")]
    NotASequence(String),
    #[error("index {index} out of range for `{path}` of length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
    #[error(transparent)]
    Bytes(#[from] BytesError),
}

/// Turn bytes typed in `encoding` into the raw input of a byte vector.
pub fn decode_bytes(encoding: BytesEncoding, text: &str) -> Result<RawValue, FormError> {
    let bytes = encoding.decode(text)?;
    Ok(RawValue::from(bytes))
}
