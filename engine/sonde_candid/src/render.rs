//! Value rendering.
//!
//! JSON, raw and canonical modes short-circuit to a single formatter for the
//! whole value. Pretty mode walks the type alongside the value; when the two
//! disagree the node falls back to its JSON form instead of failing.

use serde_json::Value as Json;
use sonde_ir::timestamp::{classify_timestamp, looks_like_time_field};
use sonde_ir::{Body, DisplayMode, RenderContext, Rendered};
use sonde_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::canonical::{args_to_string, value_to_string};
use crate::{Idx, Pool, Tag, Value, WireCodec};

/// Render one value in the context's display mode.
pub fn render<C: WireCodec + ?Sized>(
    pool: &Pool,
    codec: &C,
    ty: Idx,
    value: &Value,
    cx: &RenderContext,
) -> Rendered {
    trace!(mode = cx.display.as_str(), ty = %pool.format_type(ty), "render");
    match cx.display {
        DisplayMode::Json => Rendered::json(&value.to_json()),
        DisplayMode::Raw => match codec.encode(pool, ty, value) {
            Ok(bytes) => Rendered::raw(&bytes),
            Err(msg) => {
                trace!(error = %msg, "encode failed, showing JSON");
                Rendered::json(&value.to_json())
            }
        },
        DisplayMode::Canonical => Rendered::new(Body::Canonical(value_to_string(pool, ty, value))),
        DisplayMode::Pretty => Pretty { pool, cx }.value(ty, value, None),
    }
}

/// Render an argument or reply list.
pub fn render_args<C: WireCodec + ?Sized>(
    pool: &Pool,
    codec: &C,
    tys: &[Idx],
    values: &[Value],
    cx: &RenderContext,
) -> Rendered {
    trace!(mode = cx.display.as_str(), arity = values.len(), "render args");
    let as_json = || Rendered::json(&Json::Array(values.iter().map(Value::to_json).collect()));
    match cx.display {
        DisplayMode::Json => as_json(),
        DisplayMode::Raw => match codec.encode_args(pool, tys, values) {
            Ok(bytes) => Rendered::raw(&bytes),
            Err(msg) => {
                trace!(error = %msg, "encode failed, showing JSON");
                as_json()
            }
        },
        DisplayMode::Canonical => Rendered::new(Body::Canonical(args_to_string(pool, tys, values))),
        DisplayMode::Pretty => {
            let pretty = Pretty { pool, cx };
            let children = values
                .iter()
                .enumerate()
                .map(|(i, value)| match tys.get(i) {
                    Some(&ty) => pretty.value(ty, value, None),
                    None => Rendered::json(&value.to_json()),
                })
                .filter(|child| child.body != Body::Nothing)
                .collect();
            Rendered::new(Body::Nested(children))
        }
    }
}

struct Pretty<'a> {
    pool: &'a Pool,
    cx: &'a RenderContext,
}

impl Pretty<'_> {
    fn value(&self, ty: Idx, value: &Value, label: Option<String>) -> Rendered {
        ensure_sufficient_stack(|| {
            let ty = self.pool.resolve(ty);
            let tag = self.pool.tag(ty);
            let node = match (tag, value) {
                (Tag::Null, _) => Rendered::new(Body::Nothing),
                (Tag::Vec, _) if self.pool.is_blob(ty) => self.bytes(value),
                (Tag::Vec, Value::Vec(items)) => self.vec(ty, items),
                (Tag::Record, Value::Record(_)) => self.record(ty, value),
                (Tag::Variant, Value::Variant(selected, inner)) => {
                    match self.pool.field_by_label(ty, selected) {
                        Some((field, field_ty)) => {
                            // The field name drives the timestamp heuristic but is
                            // already shown as the heading.
                            let inner = (self.pool.resolved_tag(field_ty) != Tag::Null).then(|| {
                                Box::new(self.value(field_ty, inner, Some(field.key())).labeled(None))
                            });
                            Rendered::new(Body::Heading {
                                name: field.key(),
                                inner,
                            })
                        }
                        None => Rendered::json(&value.to_json()),
                    }
                }
                (Tag::Opt, Value::Opt(None)) => Rendered::new(Body::Empty),
                (Tag::Opt, Value::Opt(Some(inner))) => match self.pool.inner(ty) {
                    Some(inner_ty) => return self.value(inner_ty, inner, label),
                    None => Rendered::json(&value.to_json()),
                },
                (tag, Value::Number(n)) if tag.is_integer() => {
                    let relative = label
                        .as_deref()
                        .filter(|name| self.cx.timestamps && looks_like_time_field(name))
                        .and_then(|_| classify_timestamp(n))
                        .map(|ts| ts.relative_to(self.cx.now));
                    Rendered::new(Body::Number {
                        text: n.to_string(),
                        relative,
                    })
                }
                (Tag::Float32 | Tag::Float64, Value::Float(f)) => Rendered::new(Body::Number {
                    text: f.to_string(),
                    relative: None,
                }),
                (Tag::Text, Value::Text(text)) => Rendered::text(text),
                (Tag::Principal, Value::Principal(p)) => Rendered::new(Body::Principal {
                    text: p.to_text(),
                    link: self.cx.subject.as_ref() != Some(p),
                }),
                _ => Rendered::json(&value.to_json()),
            };
            node.labeled(label)
        })
    }

    fn bytes(&self, value: &Value) -> Rendered {
        match value.as_bytes() {
            Some(bytes) if bytes.is_empty() => Rendered::new(Body::Empty),
            Some(bytes) => Rendered::new(Body::Bytes {
                encoding: self.cx.bytes,
                text: self.cx.bytes.encode(&bytes),
            })
            .counted(Some(bytes.len())),
            None => Rendered::json(&value.to_json()),
        }
    }

    fn vec(&self, ty: Idx, items: &[Value]) -> Rendered {
        let Some(elem) = self.pool.inner(ty) else {
            return Rendered::new(Body::Empty);
        };
        let count = (!items.is_empty()).then_some(items.len());
        if self.pool.resolved_tag(elem).is_numeric() {
            let json = Json::Array(items.iter().map(Value::to_json).collect());
            return Rendered::json(&json).counted(count);
        }
        if items.is_empty() {
            return Rendered::new(Body::Empty);
        }
        let children = items
            .iter()
            .map(|item| self.value(elem, item, None))
            .collect();
        Rendered::new(Body::Nested(children)).counted(count)
    }

    fn record(&self, ty: Idx, value: &Value) -> Rendered {
        let positional = self.pool.is_tuple(ty);
        let children = self
            .pool
            .fields(ty)
            .filter_map(|(label, field_ty)| {
                let field = value.field(label)?;
                let name = (!positional).then(|| label.key());
                Some(self.value(field_ty, field, name))
            })
            .filter(|child| child.body != Body::Nothing)
            .collect();
        Rendered::new(Body::Nested(children))
    }
}

#[cfg(test)]
mod tests;
