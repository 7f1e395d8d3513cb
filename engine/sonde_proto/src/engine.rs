//! The protobuf [`ValueEngine`].

use sonde_ir::{PathSeg, RawValue, RenderContext, Rendered, Validated, ValueEngine};

use crate::{render, validate, Cardinality, Kind, ProtoCodec, RpcMethod, Schema, Ty, Value};

/// A schema together with the codec that encodes its messages.
#[derive(Clone, Debug)]
pub struct ProtoEngine<C> {
    schema: Schema,
    codec: C,
}

impl<C: ProtoCodec> ProtoEngine<C> {
    pub fn new(schema: Schema, codec: C) -> Self {
        Self { schema, codec }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn methods(&self) -> &[RpcMethod] {
        self.schema.methods()
    }
}

impl<C: ProtoCodec> ValueEngine for ProtoEngine<C> {
    type Type = Ty;
    type Value = Value;

    fn default_input(&self, ty: Ty) -> RawValue {
        self.schema.default_input(ty)
    }

    fn validate(&self, ty: Ty, input: &RawValue) -> Validated<Value> {
        validate::validate(&self.schema, ty, input)
    }

    fn render(&self, ty: Ty, value: &Value, cx: &RenderContext) -> Rendered {
        render::render(&self.schema, &self.codec, ty, value, cx)
    }

    fn render_args(&self, tys: &[Ty], values: &[Value], cx: &RenderContext) -> Rendered {
        render::render_args(&self.schema, &self.codec, tys, values, cx)
    }

    fn child_type(&self, ty: Ty, seg: &PathSeg) -> Option<Ty> {
        match (ty.cardinality, ty.kind, seg) {
            (Cardinality::Repeated, _, PathSeg::Index(_)) => Some(ty.single()),
            (Cardinality::Repeated, _, PathSeg::Field(_)) => None,
            (_, Kind::Message(id), PathSeg::Field(name)) => {
                let def = self.schema.message(id);
                def.fields
                    .iter()
                    .find(|f| f.name == *name || f.json_name() == *name)
                    .map(|f| f.ty)
            }
            _ => None,
        }
    }

    fn element_type(&self, ty: Ty) -> Option<Ty> {
        (ty.cardinality == Cardinality::Repeated).then(|| ty.single())
    }

    fn format_type(&self, ty: Ty) -> String {
        self.schema.format_ty(ty)
    }
}
