//! Default inputs for protobuf types.

use serde_json::{Map, Value as Json};

use crate::{Cardinality, Kind, MessageId, Scalar, Schema, Ty};

impl Schema {
    /// Minimal raw input for `ty`.
    ///
    /// A message requested directly expands to one default per field, but
    /// message-typed fields inside it start absent (`null`): singular
    /// messages have presence, and leaving them unset keeps
    /// self-referential messages finite.
    pub fn default_input(&self, ty: Ty) -> Json {
        match (ty.cardinality, ty.kind) {
            (Cardinality::Repeated, _) => Json::Array(Vec::new()),
            (Cardinality::Optional, _) => Json::Null,
            (Cardinality::Single, Kind::Message(id)) => self.default_message(id),
            (Cardinality::Single, _) => self.default_field(ty),
        }
    }

    /// Object with one default per field of message `id`.
    pub fn default_message(&self, id: MessageId) -> Json {
        Json::Object(
            self.message(id)
                .fields
                .iter()
                .map(|field| (field.name.clone(), self.default_field(field.ty)))
                .collect::<Map<_, _>>(),
        )
    }

    fn default_field(&self, ty: Ty) -> Json {
        match (ty.cardinality, ty.kind) {
            (Cardinality::Repeated, _) => Json::Array(Vec::new()),
            (Cardinality::Optional, _) | (_, Kind::Message(_)) => Json::Null,
            (Cardinality::Single, Kind::Enum(id)) => self
                .enumeration(id)
                .values
                .first()
                .map_or(Json::Null, |(name, _)| Json::String(name.clone())),
            (Cardinality::Single, Kind::Scalar(Scalar::Bool)) => Json::Bool(false),
            (Cardinality::Single, Kind::Scalar(Scalar::Bytes)) => Json::Array(Vec::new()),
            (Cardinality::Single, Kind::Scalar(_)) => Json::String(String::new()),
        }
    }
}
