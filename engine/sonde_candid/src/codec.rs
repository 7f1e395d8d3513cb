//! The wire codec collaborator.
//!
//! Byte layout of the Candid binary format is not this crate's concern; the
//! engine only needs something that can turn a typed value into bytes. The
//! raw display mode shows those bytes, and validation of leaf kinds with no
//! dedicated coercion uses a successful encode as its validity check.

use crate::{Idx, Pool, Value};

/// Encodes typed Candid values.
pub trait WireCodec {
    /// Encode a single value of type `ty`.
    fn encode(&self, pool: &Pool, ty: Idx, value: &Value) -> Result<Vec<u8>, String>;

    /// Encode a whole argument list as one message.
    fn encode_args(&self, pool: &Pool, tys: &[Idx], values: &[Value]) -> Result<Vec<u8>, String>;
}

impl<T: WireCodec + ?Sized> WireCodec for &T {
    fn encode(&self, pool: &Pool, ty: Idx, value: &Value) -> Result<Vec<u8>, String> {
        (**self).encode(pool, ty, value)
    }

    fn encode_args(&self, pool: &Pool, tys: &[Idx], values: &[Value]) -> Result<Vec<u8>, String> {
        (**self).encode_args(pool, tys, values)
    }
}

#[cfg(test)]
pub(crate) mod fake;
