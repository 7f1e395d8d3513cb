//! Value rendering for protobuf types.

use serde_json::Value as Json;
use sonde_ir::timestamp::{classify_timestamp, looks_like_time_field};
use sonde_ir::{Body, DisplayMode, RenderContext, Rendered};
use sonde_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::text_format::to_text_format;
use crate::{Cardinality, Kind, ProtoCodec, Scalar, Schema, Ty, Value};

/// Render one value in the context's display mode.
pub fn render<C: ProtoCodec + ?Sized>(
    schema: &Schema,
    codec: &C,
    ty: Ty,
    value: &Value,
    cx: &RenderContext,
) -> Rendered {
    trace!(mode = cx.display.as_str(), ty = %schema.format_ty(ty), "render");
    match cx.display {
        DisplayMode::Json => Rendered::json(&value.to_json()),
        DisplayMode::Raw => match codec.encode(schema, ty, value) {
            Ok(bytes) => Rendered::raw(&bytes),
            Err(msg) => {
                trace!(error = %msg, "encode failed, showing JSON");
                Rendered::json(&value.to_json())
            }
        },
        DisplayMode::Canonical => Rendered::new(Body::Canonical(to_text_format(value))),
        DisplayMode::Pretty => Pretty { schema, cx }.value(ty, value, None),
    }
}

/// Render a request or reply list. Unary rpcs have one message each way;
/// several values are shown in order.
pub fn render_args<C: ProtoCodec + ?Sized>(
    schema: &Schema,
    codec: &C,
    tys: &[Ty],
    values: &[Value],
    cx: &RenderContext,
) -> Rendered {
    if let ([ty], [value]) = (tys, values) {
        return render(schema, codec, *ty, value, cx);
    }
    match cx.display {
        DisplayMode::Json => {
            Rendered::json(&Json::Array(values.iter().map(Value::to_json).collect()))
        }
        DisplayMode::Canonical => {
            let text: Vec<_> = values.iter().map(to_text_format).collect();
            Rendered::new(Body::Canonical(text.join("\n")))
        }
        DisplayMode::Raw | DisplayMode::Pretty => {
            let children = values
                .iter()
                .zip(tys)
                .map(|(value, &ty)| render(schema, codec, ty, value, cx))
                .collect();
            Rendered::new(Body::Nested(children))
        }
    }
}

struct Pretty<'a> {
    schema: &'a Schema,
    cx: &'a RenderContext,
}

impl Pretty<'_> {
    fn value(&self, ty: Ty, value: &Value, label: Option<String>) -> Rendered {
        ensure_sufficient_stack(|| {
            let node = match (ty.cardinality, ty.kind, value) {
                (_, _, Value::Unset) => Rendered::new(Body::Empty),
                (Cardinality::Repeated, kind, Value::List(items)) => self.list(ty.single(), kind, items),
                (_, Kind::Message(id), Value::Message(fields)) => {
                    let children = self
                        .schema
                        .message(id)
                        .fields
                        .iter()
                        .filter_map(|field| {
                            let (_, v) = fields.iter().find(|(name, _)| *name == field.name)?;
                            Some(self.value(field.ty, v, Some(field.name.clone())))
                        })
                        .collect();
                    Rendered::new(Body::Nested(children))
                }
                (_, Kind::Enum(_), Value::Enum { name, .. }) => {
                    Rendered::new(Body::Text(name.clone()))
                }
                (_, Kind::Scalar(Scalar::Bytes), Value::Bytes(bytes)) if bytes.is_empty() => {
                    Rendered::new(Body::Empty)
                }
                (_, Kind::Scalar(Scalar::Bytes), Value::Bytes(bytes)) => {
                    Rendered::new(Body::Bytes {
                        encoding: self.cx.bytes,
                        text: self.cx.bytes.encode(bytes),
                    })
                    .counted(Some(bytes.len()))
                }
                (_, Kind::Scalar(Scalar::String), Value::String(text)) => Rendered::text(text),
                (_, Kind::Scalar(scalar), Value::Int(n)) if scalar.is_integer() => {
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
                (_, Kind::Scalar(scalar), Value::Float(f)) if scalar.is_float() => {
                    Rendered::new(Body::Number {
                        text: f.to_string(),
                        relative: None,
                    })
                }
                _ => Rendered::json(&value.to_json()),
            };
            node.labeled(label)
        })
    }

    fn list(&self, elem: Ty, kind: Kind, items: &[Value]) -> Rendered {
        let count = (!items.is_empty()).then_some(items.len());
        if let Kind::Scalar(scalar) = kind {
            if scalar.is_integer() || scalar.is_float() {
                let json = Json::Array(items.iter().map(Value::to_json).collect());
                return Rendered::json(&json).counted(count);
            }
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
}
