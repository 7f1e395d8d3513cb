//! Input validation.
//!
//! Raw form input is coerced against a type, node by node:
//!
//! - records and tuples substitute their default for absent input, then
//!   validate each field; failing fields are reported by key while the
//!   fields that did coerce are kept as the partial value
//! - vectors treat anything that is not an array as empty
//! - variants need a single-key object naming a declared field
//! - options read falsy input as absent and otherwise validate the inner
//!   value directly
//! - text and bool always coerce; principals and fixed-width integers parse
//!   their text
//! - every other leaf converts to a candidate value and is accepted if the
//!   wire codec can encode it

use serde_json::{Map, Value as Json};
use sonde_ir::input::{is_truthy, parse_big_int, parse_float, text_of};
use sonde_ir::{ErrorTree, Principal, Rejected, Validated};
use sonde_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::{Idx, Label, Pool, Tag, Value, WireCodec};

pub(crate) const INVALID_TUPLE: &str = "invalid tuple";
pub(crate) const INVALID_RECORD: &str = "invalid record";
pub(crate) const INVALID_VARIANT: &str = "invalid variant";

/// Validate `input` against `ty`.
///
/// `codec` is the validity probe for leaves without a dedicated coercion
/// (`nat`, `int`, floats, `reserved`, `empty`, references).
#[tracing::instrument(level = "trace", skip(pool, codec, input))]
pub fn validate<C: WireCodec + ?Sized>(
    pool: &Pool,
    codec: &C,
    ty: Idx,
    input: &Json,
) -> Validated<Value> {
    let result = Validator {
        pool,
        codec,
        absent: Vec::new(),
    }
    .value(ty, input);
    if let Err(rejected) = &result {
        debug!(ty = %pool.format_type(ty), error = %rejected.error, "input rejected");
    }
    result
}

struct Validator<'a, C: ?Sized> {
    pool: &'a Pool,
    codec: &'a C,
    /// Recursive types whose absent input is being filled with defaults.
    absent: Vec<Idx>,
}

impl<C: WireCodec + ?Sized> Validator<'_, C> {
    fn value(&mut self, ty: Idx, input: &Json) -> Validated<Value> {
        let pool = self.pool;
        ensure_sufficient_stack(|| {
            if input.is_null() && pool.tag(ty) == Tag::Rec {
                return self.absent_rec(ty);
            }
            let ty = pool.resolve(ty);
            match pool.tag(ty) {
                Tag::Record if pool.is_tuple(ty) => self.tuple(ty, input),
                Tag::Record => self.record(ty, input),
                Tag::Variant => self.variant(ty, input),
                Tag::Vec => self.vec(ty, input),
                Tag::Opt => self.opt(ty, input),
                Tag::Text => Ok(Value::Text(text_of(input))),
                Tag::Bool => Ok(Value::Bool(is_truthy(input))),
                Tag::Null => Ok(Value::Null),
                Tag::Principal => Principal::from_text(&text_of(input))
                    .map(Value::Principal)
                    .map_err(|e| Rejected::message(e.to_string())),
                tag if tag.is_fixed_nat() || tag.is_fixed_int() => parse_big_int(input)
                    .map(Value::Number)
                    .map_err(|e| Rejected::message(e.to_string())),
                _ => self.probe(ty, input),
            }
        })
    }

    /// Absent input for a recursive type. Filling it with defaults can reach
    /// the same type again with absent input; that repeat has no finite
    /// default and is rejected.
    fn absent_rec(&mut self, ty: Idx) -> Validated<Value> {
        let pool = self.pool;
        if self.absent.contains(&ty) {
            let name = pool.rec_name(ty).unwrap_or("<rec>");
            return Err(Rejected::message(format!(
                "recursive type {name} has no finite default"
            )));
        }
        self.absent.push(ty);
        let result = self.value(pool.resolve(ty), &Json::Null);
        self.absent.pop();
        result
    }

    fn tuple(&mut self, ty: Idx, input: &Json) -> Validated<Value> {
        let pool = self.pool;
        let substituted;
        let input = if input.is_null() {
            substituted = pool.default_input(ty);
            &substituted
        } else {
            input
        };
        let Json::Array(items) = input else {
            return Err(Rejected::message(INVALID_TUPLE));
        };

        let mut fields = Vec::with_capacity(pool.fields(ty).len());
        let mut errors = Vec::new();
        for (i, (label, field_ty)) in pool.fields(ty).enumerate() {
            let item = items.get(i).unwrap_or(&Json::Null);
            match self.value(field_ty, item) {
                Ok(v) => fields.push((label.clone(), v)),
                Err(rejected) => {
                    errors.resize(i + 1, None);
                    errors[i] = Some(rejected.error);
                }
            }
        }
        finish_record(fields, (!errors.is_empty()).then_some(ErrorTree::Elements(errors)))
    }

    fn record(&mut self, ty: Idx, input: &Json) -> Validated<Value> {
        let pool = self.pool;
        let substituted;
        let input = if input.is_null() {
            substituted = pool.default_input(ty);
            &substituted
        } else {
            input
        };
        let Json::Object(map) = input else {
            return Err(Rejected::message(INVALID_RECORD));
        };

        let mut fields = Vec::with_capacity(pool.fields(ty).len());
        let mut errors = Vec::new();
        for (label, field_ty) in pool.fields(ty) {
            let item = lookup(map, label).unwrap_or(&Json::Null);
            match self.value(field_ty, item) {
                Ok(v) => fields.push((label.clone(), v)),
                Err(rejected) => errors.push((label.key(), rejected.error)),
            }
        }
        finish_record(fields, (!errors.is_empty()).then_some(ErrorTree::Fields(errors)))
    }

    fn variant(&mut self, ty: Idx, input: &Json) -> Validated<Value> {
        let pool = self.pool;
        let substituted;
        let input = if input.is_null() {
            substituted = pool.default_input(ty);
            &substituted
        } else {
            input
        };
        let Json::Object(map) = input else {
            return Err(Rejected::message(INVALID_VARIANT));
        };
        let mut keys = map.iter();
        let (Some((key, inner)), None) = (keys.next(), keys.next()) else {
            return Err(Rejected::message(INVALID_VARIANT));
        };
        let Some((label, field_ty)) = pool.field_by_key(ty, key) else {
            return Err(Rejected::message(INVALID_VARIANT));
        };

        match self.value(field_ty, inner) {
            Ok(v) => Ok(Value::variant(label.clone(), v)),
            Err(rejected) => Err(Rejected::new(ErrorTree::keyed(label.key(), rejected.error))),
        }
    }

    fn vec(&mut self, ty: Idx, input: &Json) -> Validated<Value> {
        let pool = self.pool;
        let Json::Array(items) = input else {
            return Ok(Value::Vec(Vec::new()));
        };
        let Some(elem_ty) = pool.inner(ty) else {
            return Ok(Value::Vec(Vec::new()));
        };

        let mut values = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match self.value(elem_ty, item) {
                Ok(v) => values.push(v),
                Err(rejected) => {
                    errors.resize(i + 1, None);
                    errors[i] = Some(rejected.error);
                }
            }
        }
        if errors.is_empty() {
            Ok(Value::Vec(values))
        } else {
            Err(Rejected::new(ErrorTree::Elements(errors)))
        }
    }

    fn opt(&mut self, ty: Idx, input: &Json) -> Validated<Value> {
        let pool = self.pool;
        if !is_truthy(input) {
            return Ok(Value::none());
        }
        let Some(inner_ty) = pool.inner(ty) else {
            return Ok(Value::none());
        };
        self.value(inner_ty, input)
            .map(Value::some)
            .map_err(|rejected| Rejected::new(rejected.error))
    }

    /// Convert to a candidate value and let the codec judge it.
    fn probe(&mut self, ty: Idx, input: &Json) -> Validated<Value> {
        let pool = self.pool;
        let candidate = candidate(pool.tag(ty), input).map_err(Rejected::message)?;
        match self.codec.encode(pool, ty, &candidate) {
            Ok(_) => Ok(candidate),
            Err(msg) => Err(Rejected::message(msg)),
        }
    }
}

fn finish_record(fields: Vec<(Label, Value)>, error: Option<ErrorTree>) -> Validated<Value> {
    match error {
        None => Ok(Value::Record(fields)),
        Some(error) => Err(Rejected::with_partial(error, Value::Record(fields))),
    }
}

/// Record input keyed by label text, falling back to the numeric wire id.
fn lookup<'a>(map: &'a Map<String, Json>, label: &Label) -> Option<&'a Json> {
    map.get(&label.key())
        .or_else(|| map.get(&label.id().to_string()))
}

fn candidate(tag: Tag, input: &Json) -> Result<Value, String> {
    match tag {
        Tag::Nat | Tag::Int => parse_big_int(input)
            .map(Value::Number)
            .map_err(|e| e.to_string()),
        Tag::Float32 | Tag::Float64 => parse_float(input)
            .map(Value::Float)
            .map_err(|e| e.to_string()),
        Tag::Service => Principal::from_text(&text_of(input))
            .map(Value::Service)
            .map_err(|e| e.to_string()),
        Tag::Func => func_reference(input),
        Tag::Reserved => Ok(Value::Reserved),
        _ => Ok(Value::Null),
    }
}

/// A function reference is entered as `[service, method]` or
/// `{ "service": .., "method": .. }`.
fn func_reference(input: &Json) -> Result<Value, String> {
    let (service, method) = match input {
        Json::Array(parts) if parts.len() == 2 => (&parts[0], &parts[1]),
        Json::Object(map) => (
            map.get("service").unwrap_or(&Json::Null),
            map.get("method").unwrap_or(&Json::Null),
        ),
        _ => return Err(format!("Cannot read a function reference from {input}")),
    };
    let service = Principal::from_text(&text_of(service)).map_err(|e| e.to_string())?;
    Ok(Value::Func {
        service,
        method: text_of(method),
    })
}
