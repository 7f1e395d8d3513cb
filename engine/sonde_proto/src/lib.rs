//! The protobuf family of the sonde value engine.
//!
//! Messages and enums live in a [`Schema`]; a field type is a [`Ty`], a
//! [`Kind`] (scalar, enum or message) with a [`Cardinality`]. The operations
//! mirror the Candid family: [`Schema::default_input`], [`validate`],
//! [`render`] with protobuf text format as the canonical mode, and a
//! [`ProtoEngine`] implementing [`sonde_ir::ValueEngine`].

mod codec;
mod defaults;
mod engine;
mod schema;
mod value;

pub mod render;
pub mod text_format;
pub mod validate;

pub use codec::ProtoCodec;
pub use engine::ProtoEngine;
pub use render::{render, render_args};
pub use schema::{
    Cardinality, EnumDef, EnumId, FieldDef, Kind, MessageDef, MessageId, RpcMethod, Scalar, Schema,
    SchemaError, Ty,
};
pub use text_format::to_text_format;
pub use validate::validate;
pub use value::Value;
