//! Shared primitives for the sonde value engines.
//!
//! Both IDL families (Candid and protobuf) build their default, validate and
//! render operations out of the pieces in this crate:
//!
//! - [`PathSeg`] / [`Path`]: addresses into input and error trees.
//! - [`ErrorTree`], [`Validated`], [`Rejected`]: validation results as data.
//! - [`input`]: JS-compatible coercions for untyped form input.
//! - [`Principal`]: the textual principal codec.
//! - [`timestamp`]: the magnitude-based timestamp heuristic.
//! - [`display`]: display modes and the rendered tree.
//! - [`ValueEngine`]: the capability interface each family implements.

mod engine;
mod error_tree;
mod path;
mod principal;

pub mod display;
pub mod input;
pub mod timestamp;

pub use display::{
    Body, BytesEncoding, BytesError, DisplayMode, RenderContext, Rendered, UnknownName,
};
pub use engine::{render_output, Output, ValueEngine};
pub use error_tree::{ErrorTree, Rejected, Validated};
pub use input::NumberError;
pub use path::{display_path, Path, PathSeg};
pub use principal::{Principal, PrincipalError};

/// Raw, untyped user input as produced by form controls.
pub type RawValue = serde_json::Value;
