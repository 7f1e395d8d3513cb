//! Protobuf values.

use num_bigint::BigInt;
use serde_json::{Map, Value as Json};

/// A typed protobuf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// No value: an absent optional field or message.
    Unset,
    Bool(bool),
    /// Every integer scalar, at full precision.
    Int(BigInt),
    /// `float` or `double`.
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum { name: String, number: i32 },
    /// Present fields in declaration order.
    Message(Vec<(String, Value)>),
    /// Elements of a repeated field.
    List(Vec<Value>),
}

impl Value {
    pub fn int(n: impl Into<BigInt>) -> Self {
        Self::Int(n.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn enumeration(name: impl Into<String>, number: i32) -> Self {
        Self::Enum {
            name: name.into(),
            number,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Message(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Type-agnostic JSON: integers as decimal strings, bytes as hex, enums
    /// by name. Unset fields are left out of messages.
    pub fn to_json(&self) -> Json {
        sonde_stack::ensure_sufficient_stack(|| match self {
            Self::Unset => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(n) => Json::String(n.to_string()),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or_else(|| Json::String(f.to_string()), Json::Number),
            Self::String(s) => Json::String(s.clone()),
            Self::Bytes(bytes) => Json::String(hex::encode(bytes)),
            Self::Enum { name, .. } => Json::String(name.clone()),
            Self::Message(fields) => Json::Object(
                fields
                    .iter()
                    .filter(|(_, v)| *v != Self::Unset)
                    .map(|(name, v)| (name.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
        })
    }
}
