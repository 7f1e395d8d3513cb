//! Candid values.
//!
//! Integers of every width are held as `BigInt`: validation never narrows,
//! so a `nat64` above 2^53 keeps every digit. Narrowing to a native width
//! happens only at a boundary that needs it, through [`Value::narrow`].

use num_bigint::BigInt;
use serde_json::{Map, Value as Json};
use sonde_ir::Principal;
use thiserror::Error;

use crate::Label;

/// A typed Candid value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Any integer: `nat`, `int` and the fixed-width kinds.
    Number(BigInt),
    /// `float32` or `float64`.
    Float(f64),
    Text(String),
    Reserved,
    Principal(Principal),
    /// A decoded `vec nat8`.
    Blob(Vec<u8>),
    Vec(Vec<Value>),
    Opt(Option<Box<Value>>),
    /// Fields in declaration order. Validation failures may leave some out.
    Record(Vec<(Label, Value)>),
    /// The selected field and its value.
    Variant(Label, Box<Value>),
    /// A function reference.
    Func { service: Principal, method: String },
    /// A service reference.
    Service(Principal),
}

/// A value that does not fit the native type a consumer asked for.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NarrowError {
    #[error("{value} does not fit in {target}")]
    Overflow { value: String, target: &'static str },
    #[error("expected a number, found {0}")]
    NotNumber(&'static str),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn number(n: impl Into<BigInt>) -> Self {
        Self::Number(n.into())
    }

    pub fn some(inner: Value) -> Self {
        Self::Opt(Some(Box::new(inner)))
    }

    pub fn none() -> Self {
        Self::Opt(None)
    }

    pub fn variant(label: Label, inner: Value) -> Self {
        Self::Variant(label, Box::new(inner))
    }

    /// Short name of the value's shape, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Reserved => "reserved",
            Self::Principal(_) => "principal",
            Self::Blob(_) => "blob",
            Self::Vec(_) => "vec",
            Self::Opt(_) => "opt",
            Self::Record(_) => "record",
            Self::Variant(..) => "variant",
            Self::Func { .. } => "func",
            Self::Service(_) => "service",
        }
    }

    /// Narrow an integer to a native width.
    ///
    /// This is the one place precision could be lost, so it refuses instead.
    pub fn narrow<T>(&self) -> Result<T, NarrowError>
    where
        T: for<'a> TryFrom<&'a BigInt>,
    {
        match self {
            Self::Number(n) => T::try_from(n).map_err(|_| NarrowError::Overflow {
                value: n.to_string(),
                target: std::any::type_name::<T>(),
            }),
            other => Err(NarrowError::NotNumber(other.kind())),
        }
    }

    /// Bytes of a byte vector, whether decoded as a blob or validated as a
    /// vector of small numbers.
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Blob(bytes) => Some(bytes.clone()),
            Self::Vec(items) => items
                .iter()
                .map(|item| match item {
                    Self::Number(n) => u8::try_from(n).ok(),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Field of a record value matching `label` by wire id.
    pub fn field(&self, label: &Label) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields
                .iter()
                .find(|(l, _)| l.same_field(label))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// JSON with the display extensions: big integers as decimal strings,
    /// principals as their text, byte buffers as hex.
    ///
    /// Options follow the `[]` / `[value]` convention and tuples become
    /// arrays, so the output needs no type to produce.
    pub fn to_json(&self) -> Json {
        sonde_stack::ensure_sufficient_stack(|| match self {
            Self::Null | Self::Reserved => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Number(n) => Json::String(n.to_string()),
            Self::Float(f) => float_json(*f),
            Self::Text(s) => Json::String(s.clone()),
            Self::Principal(p) | Self::Service(p) => Json::String(p.to_text()),
            Self::Blob(bytes) => Json::String(hex::encode(bytes)),
            Self::Vec(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Opt(None) => Json::Array(Vec::new()),
            Self::Opt(Some(inner)) => Json::Array(vec![inner.to_json()]),
            Self::Record(fields) if is_positional(fields) => {
                Json::Array(fields.iter().map(|(_, v)| v.to_json()).collect())
            }
            Self::Record(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(label, v)| (label.key(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Self::Variant(label, inner) => {
                let mut map = Map::new();
                map.insert(label.key(), inner.to_json());
                Json::Object(map)
            }
            Self::Func { service, method } => Json::Array(vec![
                Json::String(service.to_text()),
                Json::String(method.clone()),
            ]),
        })
    }
}

fn float_json(f: f64) -> Json {
    serde_json::Number::from_f64(f)
        .map_or_else(|| Json::String(f.to_string()), Json::Number)
}

#[allow(clippy::cast_possible_truncation, reason = "tuple arity fits u32")]
fn is_positional(fields: &[(Label, Value)]) -> bool {
    !fields.is_empty()
        && fields
            .iter()
            .enumerate()
            .all(|(i, (label, _))| matches!(label, Label::Unnamed(n) if *n == i as u32))
}
