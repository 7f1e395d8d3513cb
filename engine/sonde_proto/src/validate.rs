//! Input validation for protobuf types.
//!
//! Follows the same policy as the Candid validator where the two families
//! overlap: lenient repeated fields, keyed message errors with the coerced
//! remainder kept, text and bool always coercing, integers parsed at full
//! precision with advisory bounds. Message-typed fields have presence, so a
//! `null` there means "unset" rather than "use the default".

use serde_json::{Map, Value as Json};
use sonde_ir::input::{is_truthy, parse_big_int, parse_float, text_of};
use sonde_ir::{BytesEncoding, ErrorTree, Rejected, Validated};
use sonde_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::{Cardinality, EnumId, FieldDef, Kind, MessageId, Scalar, Schema, Ty, Value};

pub(crate) const INVALID_MESSAGE: &str = "invalid message";
pub(crate) const INVALID_BYTES: &str = "invalid bytes";

/// Validate `input` against `ty`.
#[tracing::instrument(level = "trace", skip(schema, input))]
pub fn validate(schema: &Schema, ty: Ty, input: &Json) -> Validated<Value> {
    let result = Validator { schema }.value(ty, input, Presence::Root);
    if let Err(rejected) = &result {
        debug!(ty = %schema.format_ty(ty), error = %rejected.error, "input rejected");
    }
    result
}

/// Where a value sits, which decides what a `null` message means.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Presence {
    /// Requested directly or a list element: absent means default.
    Root,
    /// A message field: absent means unset.
    Field,
}

struct Validator<'a> {
    schema: &'a Schema,
}

impl Validator<'_> {
    fn value(&self, ty: Ty, input: &Json, presence: Presence) -> Validated<Value> {
        ensure_sufficient_stack(|| match ty.cardinality {
            Cardinality::Repeated => self.repeated(ty.single(), input),
            Cardinality::Optional if input.is_null() => Ok(Value::Unset),
            Cardinality::Optional | Cardinality::Single => self.single(ty.kind, input, presence),
        })
    }

    fn repeated(&self, elem: Ty, input: &Json) -> Validated<Value> {
        let Json::Array(items) = input else {
            return Ok(Value::List(Vec::new()));
        };
        let mut values = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match self.value(elem, item, Presence::Root) {
                Ok(v) => values.push(v),
                Err(rejected) => {
                    errors.resize(i + 1, None);
                    errors[i] = Some(rejected.error);
                }
            }
        }
        if errors.is_empty() {
            Ok(Value::List(values))
        } else {
            Err(Rejected::new(ErrorTree::Elements(errors)))
        }
    }

    fn single(&self, kind: Kind, input: &Json, presence: Presence) -> Validated<Value> {
        match kind {
            Kind::Message(_) if input.is_null() && presence == Presence::Field => Ok(Value::Unset),
            Kind::Message(id) => self.message(id, input),
            Kind::Enum(id) => self.enumeration(id, input),
            Kind::Scalar(scalar) => scalar_value(scalar, input),
        }
    }

    fn message(&self, id: MessageId, input: &Json) -> Validated<Value> {
        let substituted;
        let input = if input.is_null() {
            substituted = self.schema.default_message(id);
            &substituted
        } else {
            input
        };
        let Json::Object(map) = input else {
            return Err(Rejected::message(INVALID_MESSAGE));
        };

        let def = self.schema.message(id);
        let mut fields = Vec::with_capacity(def.fields.len());
        let mut errors = Vec::new();
        for field in &def.fields {
            let item = lookup(map, field).unwrap_or(&Json::Null);
            match self.value(field.ty, item, Presence::Field) {
                Ok(v) => fields.push((field.name.clone(), v)),
                Err(rejected) => errors.push((field.name.clone(), rejected.error)),
            }
        }
        if errors.is_empty() {
            Ok(Value::Message(fields))
        } else {
            Err(Rejected::with_partial(
                ErrorTree::Fields(errors),
                Value::Message(fields),
            ))
        }
    }

    fn enumeration(&self, id: EnumId, input: &Json) -> Validated<Value> {
        let def = self.schema.enumeration(id);
        let found = match input {
            Json::Null => def.values.first(),
            Json::String(name) => def.by_name(name),
            Json::Number(n) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .and_then(|n| def.by_number(n)),
            _ => None,
        };
        found
            .map(|(name, number)| Value::enumeration(name.clone(), *number))
            .ok_or_else(|| {
                Rejected::message(format!("unknown value {input} for enum {}", def.name))
            })
    }
}

fn lookup<'a>(map: &'a Map<String, Json>, field: &FieldDef) -> Option<&'a Json> {
    map.get(&field.name)
        .or_else(|| map.get(&field.json_name()))
}

fn scalar_value(scalar: Scalar, input: &Json) -> Validated<Value> {
    match scalar {
        Scalar::Bool => Ok(Value::Bool(is_truthy(input))),
        Scalar::String => Ok(Value::String(text_of(input))),
        Scalar::Bytes => bytes(input),
        Scalar::Double | Scalar::Float => parse_float(input)
            .map(Value::Float)
            .map_err(|e| Rejected::message(e.to_string())),
        _ => parse_big_int(input)
            .map(Value::Int)
            .map_err(|e| Rejected::message(e.to_string())),
    }
}

/// Bytes come in as an array of numbers or as base64 text.
fn bytes(input: &Json) -> Validated<Value> {
    match input {
        Json::Null => Ok(Value::Bytes(Vec::new())),
        Json::String(text) => BytesEncoding::Base64
            .decode(text)
            .map(Value::Bytes)
            .map_err(|e| Rejected::message(e.to_string())),
        Json::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            let mut errors = Vec::new();
            for (i, item) in items.iter().enumerate() {
                let byte = parse_big_int(item)
                    .map_err(|e| e.to_string())
                    .and_then(|n| u8::try_from(&n).map_err(|_| format!("{n} is not a byte")));
                match byte {
                    Ok(b) => out.push(b),
                    Err(msg) => {
                        errors.resize(i + 1, None);
                        errors[i] = Some(ErrorTree::Message(msg));
                    }
                }
            }
            if errors.is_empty() {
                Ok(Value::Bytes(out))
            } else {
                Err(Rejected::new(ErrorTree::Elements(errors)))
            }
        }
        _ => Err(Rejected::message(INVALID_BYTES)),
    }
}

#[cfg(test)]
mod tests;
