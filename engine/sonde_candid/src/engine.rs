//! The Candid [`ValueEngine`].

use sonde_ir::{PathSeg, RawValue, RenderContext, Rendered, Validated, ValueEngine};

use crate::{render, validate, FuncModes, Idx, Pool, Tag, Value, WireCodec};

/// A service's types together with the codec that encodes its values.
#[derive(Clone, Debug)]
pub struct CandidEngine<C> {
    pool: Pool,
    codec: C,
}

/// One method of a service, with its types still in the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub args: Vec<Idx>,
    pub rets: Vec<Idx>,
    pub modes: FuncModes,
}

impl<C: WireCodec> CandidEngine<C> {
    pub fn new(pool: Pool, codec: C) -> Self {
        Self { pool, codec }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Methods of `service` in declaration order. Entries that are not
    /// function types are skipped.
    pub fn methods(&self, service: Idx) -> Vec<Method> {
        let service = self.pool.resolve(service);
        self.pool
            .fields(service)
            .filter_map(|(label, ty)| {
                let ty = self.pool.resolve(ty);
                (self.pool.tag(ty) == Tag::Func).then(|| Method {
                    name: label.key(),
                    args: self.pool.func_args(ty),
                    rets: self.pool.func_rets(ty),
                    modes: self.pool.func_modes(ty),
                })
            })
            .collect()
    }

    /// Look one method up by name.
    pub fn method(&self, service: Idx, name: &str) -> Option<Method> {
        self.methods(service).into_iter().find(|m| m.name == name)
    }

    /// Step through options and recursive references, which add no input
    /// level of their own.
    fn transparent(&self, mut ty: Idx) -> Idx {
        loop {
            ty = self.pool.resolve(ty);
            match self.pool.tag(ty) {
                Tag::Opt => match self.pool.inner(ty) {
                    Some(inner) => ty = inner,
                    None => return ty,
                },
                _ => return ty,
            }
        }
    }
}

impl<C: WireCodec> ValueEngine for CandidEngine<C> {
    type Type = Idx;
    type Value = Value;

    fn default_input(&self, ty: Idx) -> RawValue {
        self.pool.default_input(ty)
    }

    fn validate(&self, ty: Idx, input: &RawValue) -> Validated<Value> {
        validate::validate(&self.pool, &self.codec, ty, input)
    }

    fn render(&self, ty: Idx, value: &Value, cx: &RenderContext) -> Rendered {
        render::render(&self.pool, &self.codec, ty, value, cx)
    }

    fn render_args(&self, tys: &[Idx], values: &[Value], cx: &RenderContext) -> Rendered {
        render::render_args(&self.pool, &self.codec, tys, values, cx)
    }

    fn child_type(&self, ty: Idx, seg: &PathSeg) -> Option<Idx> {
        let ty = self.transparent(ty);
        match (self.pool.tag(ty), seg) {
            (Tag::Record | Tag::Variant, PathSeg::Field(key)) => {
                self.pool.field_by_key(ty, key).map(|(_, field)| field)
            }
            (Tag::Record, PathSeg::Index(i)) if self.pool.is_tuple(ty) => {
                self.pool.fields(ty).nth(*i).map(|(_, field)| field)
            }
            (Tag::Vec, PathSeg::Index(_)) => self.pool.inner(ty),
            _ => None,
        }
    }

    fn element_type(&self, ty: Idx) -> Option<Idx> {
        let ty = self.transparent(ty);
        (self.pool.tag(ty) == Tag::Vec)
            .then(|| self.pool.inner(ty))
            .flatten()
    }

    fn is_choice(&self, ty: Idx) -> bool {
        self.pool.tag(self.transparent(ty)) == Tag::Variant
    }

    fn format_type(&self, ty: Idx) -> String {
        self.pool.format_type(ty)
    }
}
