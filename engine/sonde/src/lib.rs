//! sonde: forms and reply display for canister and RPC methods.
//!
//! The engine is split by IDL family. [`sonde_candid`] and [`sonde_proto`]
//! each implement [`ValueEngine`]; [`sonde_form`] binds a method's inputs to
//! either. This crate picks the family at runtime ([`AnyEngine`]), carries
//! user [`Preferences`], and sets up logging.

mod family;
mod preferences;

use std::sync::Once;

pub use family::{candid_signature, proto_signature, AnyEngine, AnyValue, Family, TypeRef};
pub use preferences::{ConfigError, Preferences};

pub use sonde_form::{
    decode_bytes, CallMode, Caller, FormError, FormState, MethodForm, MethodSignature,
};
pub use sonde_ir::{
    BytesEncoding, DisplayMode, ErrorTree, Output, PathSeg, RawValue, RenderContext, Rendered,
    ValueEngine,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Enable with `RUST_LOG=sonde_form=debug` or
/// `RUST_LOG=sonde_candid=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
