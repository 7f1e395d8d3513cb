//! Runtime selection between the IDL families.
//!
//! A page that loads its interface description at runtime does not know
//! statically whether it talks Candid or protobuf. [`AnyEngine`] wraps either
//! engine behind one [`ValueEngine`] whose types and values are tagged with
//! their family. Mixing a type of one family with the engine of the other is
//! reported, never coerced.

use std::fmt;

use sonde_candid::{CandidEngine, Idx, Method, WireCodec};
use sonde_form::{CallMode, MethodSignature};
use sonde_ir::{PathSeg, RawValue, Rejected, RenderContext, Rendered, Validated, ValueEngine};
use sonde_proto::{ProtoCodec, ProtoEngine, RpcMethod, Ty};

const FAMILY_MISMATCH: &str = "type and engine belong to different IDL families";

/// An interface description language.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Candid,
    Proto,
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candid => "candid",
            Self::Proto => "protobuf",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type handle of either family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Candid(Idx),
    Proto(Ty),
}

impl TypeRef {
    pub fn family(self) -> Family {
        match self {
            Self::Candid(_) => Family::Candid,
            Self::Proto(_) => Family::Proto,
        }
    }
}

/// A typed value of either family.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyValue {
    Candid(sonde_candid::Value),
    Proto(sonde_proto::Value),
}

impl AnyValue {
    pub fn family(&self) -> Family {
        match self {
            Self::Candid(_) => Family::Candid,
            Self::Proto(_) => Family::Proto,
        }
    }

    /// The family's JSON rendering of the value.
    pub fn to_json(&self) -> RawValue {
        match self {
            Self::Candid(v) => v.to_json(),
            Self::Proto(v) => v.to_json(),
        }
    }
}

/// One engine of either family.
pub enum AnyEngine<C, P> {
    /// A Candid pool and the service whose methods are offered.
    Candid {
        engine: CandidEngine<C>,
        service: Idx,
    },
    Proto(ProtoEngine<P>),
}

impl<C: WireCodec, P: ProtoCodec> AnyEngine<C, P> {
    pub fn family(&self) -> Family {
        match self {
            Self::Candid { .. } => Family::Candid,
            Self::Proto(_) => Family::Proto,
        }
    }

    /// Every callable method, in declaration order.
    pub fn methods(&self) -> Vec<MethodSignature<TypeRef>> {
        match self {
            Self::Candid { engine, service } => engine
                .methods(*service)
                .into_iter()
                .map(|m| lift(candid_signature(m), TypeRef::Candid))
                .collect(),
            Self::Proto(engine) => engine
                .methods()
                .iter()
                .map(|m| lift(proto_signature(m), TypeRef::Proto))
                .collect(),
        }
    }

    pub fn method(&self, name: &str) -> Option<MethodSignature<TypeRef>> {
        self.methods().into_iter().find(|m| m.name == name)
    }
}

/// Form signature of a Candid service method.
pub fn candid_signature(method: Method) -> MethodSignature<Idx> {
    let mode = if method.modes.is_read_only() {
        CallMode::Query
    } else {
        CallMode::Update
    };
    MethodSignature::new(method.name, method.args, method.rets, mode)
}

/// Form signature of a unary rpc: one request message in, one reply out.
pub fn proto_signature(method: &RpcMethod) -> MethodSignature<Ty> {
    let mode = if method.read_only {
        CallMode::Query
    } else {
        CallMode::Update
    };
    MethodSignature::new(
        method.name.clone(),
        vec![Ty::message(method.input)],
        vec![Ty::message(method.output)],
        mode,
    )
}

fn lift<T, U>(sig: MethodSignature<T>, f: impl Fn(T) -> U) -> MethodSignature<U> {
    MethodSignature {
        name: sig.name,
        args: sig.args.into_iter().map(&f).collect(),
        rets: sig.rets.into_iter().map(&f).collect(),
        mode: sig.mode,
    }
}

// === Unwrapping ===

fn candid_types(tys: &[TypeRef]) -> Option<Vec<Idx>> {
    tys.iter()
        .map(|ty| match ty {
            TypeRef::Candid(idx) => Some(*idx),
            TypeRef::Proto(_) => None,
        })
        .collect()
}

fn proto_types(tys: &[TypeRef]) -> Option<Vec<Ty>> {
    tys.iter()
        .map(|ty| match ty {
            TypeRef::Proto(ty) => Some(*ty),
            TypeRef::Candid(_) => None,
        })
        .collect()
}

fn candid_values(values: &[AnyValue]) -> Option<Vec<sonde_candid::Value>> {
    values
        .iter()
        .map(|v| match v {
            AnyValue::Candid(v) => Some(v.clone()),
            AnyValue::Proto(_) => None,
        })
        .collect()
}

fn proto_values(values: &[AnyValue]) -> Option<Vec<sonde_proto::Value>> {
    values
        .iter()
        .map(|v| match v {
            AnyValue::Proto(v) => Some(v.clone()),
            AnyValue::Candid(_) => None,
        })
        .collect()
}

impl<C: WireCodec, P: ProtoCodec> ValueEngine for AnyEngine<C, P> {
    type Type = TypeRef;
    type Value = AnyValue;

    fn default_input(&self, ty: TypeRef) -> RawValue {
        match (self, ty) {
            (Self::Candid { engine, .. }, TypeRef::Candid(idx)) => engine.default_input(idx),
            (Self::Proto(engine), TypeRef::Proto(ty)) => engine.default_input(ty),
            _ => RawValue::Null,
        }
    }

    fn validate(&self, ty: TypeRef, input: &RawValue) -> Validated<AnyValue> {
        match (self, ty) {
            (Self::Candid { engine, .. }, TypeRef::Candid(idx)) => engine
                .validate(idx, input)
                .map(AnyValue::Candid)
                .map_err(|rejected| rejected.map_partial(AnyValue::Candid)),
            (Self::Proto(engine), TypeRef::Proto(ty)) => engine
                .validate(ty, input)
                .map(AnyValue::Proto)
                .map_err(|rejected| rejected.map_partial(AnyValue::Proto)),
            _ => Err(Rejected::message(FAMILY_MISMATCH)),
        }
    }

    fn render(&self, ty: TypeRef, value: &AnyValue, cx: &RenderContext) -> Rendered {
        match (self, ty, value) {
            (Self::Candid { engine, .. }, TypeRef::Candid(idx), AnyValue::Candid(v)) => {
                engine.render(idx, v, cx)
            }
            (Self::Proto(engine), TypeRef::Proto(ty), AnyValue::Proto(v)) => {
                engine.render(ty, v, cx)
            }
            _ => Rendered::error(FAMILY_MISMATCH),
        }
    }

    fn render_args(&self, tys: &[TypeRef], values: &[AnyValue], cx: &RenderContext) -> Rendered {
        match self {
            Self::Candid { engine, .. } => match (candid_types(tys), candid_values(values)) {
                (Some(tys), Some(values)) => engine.render_args(&tys, &values, cx),
                _ => Rendered::error(FAMILY_MISMATCH),
            },
            Self::Proto(engine) => match (proto_types(tys), proto_values(values)) {
                (Some(tys), Some(values)) => engine.render_args(&tys, &values, cx),
                _ => Rendered::error(FAMILY_MISMATCH),
            },
        }
    }

    fn child_type(&self, ty: TypeRef, seg: &PathSeg) -> Option<TypeRef> {
        match (self, ty) {
            (Self::Candid { engine, .. }, TypeRef::Candid(idx)) => {
                engine.child_type(idx, seg).map(TypeRef::Candid)
            }
            (Self::Proto(engine), TypeRef::Proto(ty)) => {
                engine.child_type(ty, seg).map(TypeRef::Proto)
            }
            _ => None,
        }
    }

    fn element_type(&self, ty: TypeRef) -> Option<TypeRef> {
        match (self, ty) {
            (Self::Candid { engine, .. }, TypeRef::Candid(idx)) => {
                engine.element_type(idx).map(TypeRef::Candid)
            }
            (Self::Proto(engine), TypeRef::Proto(ty)) => {
                engine.element_type(ty).map(TypeRef::Proto)
            }
            _ => None,
        }
    }

    fn is_choice(&self, ty: TypeRef) -> bool {
        match (self, ty) {
            (Self::Candid { engine, .. }, TypeRef::Candid(idx)) => engine.is_choice(idx),
            (Self::Proto(engine), TypeRef::Proto(ty)) => engine.is_choice(ty),
            _ => false,
        }
    }

    fn format_type(&self, ty: TypeRef) -> String {
        match (self, ty) {
            (Self::Candid { engine, .. }, TypeRef::Candid(idx)) => engine.format_type(idx),
            (Self::Proto(engine), TypeRef::Proto(ty)) => engine.format_type(ty),
            (_, ty) => format!("<{} type>", ty.family()),
        }
    }
}
