//! The wire codec collaborator for protobuf messages.

use crate::{Schema, Ty, Value};

/// Encodes typed protobuf values to wire bytes. Only raw display uses it.
pub trait ProtoCodec {
    fn encode(&self, schema: &Schema, ty: Ty, value: &Value) -> Result<Vec<u8>, String>;
}

impl<T: ProtoCodec + ?Sized> ProtoCodec for &T {
    fn encode(&self, schema: &Schema, ty: Ty, value: &Value) -> Result<Vec<u8>, String> {
        (**self).encode(schema, ty, value)
    }
}
