//! The Candid family of the sonde value engine.
//!
//! # Architecture
//!
//! Types live in a [`Pool`] and are named by [`Idx`] handles. Values
//! ([`Value`]) are plain trees and carry no type; every operation walks a
//! type and a value (or raw input) together:
//!
//! - [`Pool::default_input`]: the raw input a fresh form starts from
//! - [`validate`]: raw input to a typed value or an error tree
//! - [`render`] / [`render_args`]: a typed value in a display mode
//! - [`canonical`]: Candid textual values
//!
//! [`CandidEngine`] bundles a pool with a [`WireCodec`] and implements
//! [`sonde_ir::ValueEngine`].

mod codec;
mod defaults;
mod engine;
mod idx;
pub mod label;
mod pool;
mod tag;
mod value;

pub mod canonical;
pub mod render;
pub mod validate;

pub use codec::WireCodec;
pub use defaults::DEFAULT_PRINCIPAL_TEXT;
pub use engine::{CandidEngine, Method};
pub use idx::Idx;
pub use label::Label;
pub use pool::{FuncModes, Pool, PoolError};
pub use render::{render, render_args};
pub use tag::Tag;
pub use validate::validate;
pub use value::{NarrowError, Value};
