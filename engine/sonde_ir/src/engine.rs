//! The capability interface shared by the IDL families.

use std::fmt;

use crate::display::{Body, RenderContext, Rendered};
use crate::error_tree::Validated;
use crate::path::PathSeg;
use crate::RawValue;

/// Default, validate and render over one IDL family's type descriptions.
///
/// Each family keeps its own type and value model; form binding and
/// output display are written once against this trait.
pub trait ValueEngine {
    /// Handle to a type description. Cheap to copy.
    type Type: Copy + fmt::Debug;
    /// Typed value produced by validation or decoded from a reply.
    type Value: Clone + fmt::Debug;

    /// Minimal raw input for `ty`, as a form would start out.
    fn default_input(&self, ty: Self::Type) -> RawValue;

    /// Coerce raw input into a typed value or report where it is wrong.
    fn validate(&self, ty: Self::Type, input: &RawValue) -> Validated<Self::Value>;

    /// Render a single typed value in the context's display mode.
    fn render(&self, ty: Self::Type, value: &Self::Value, cx: &RenderContext) -> Rendered;

    /// Render a whole argument or reply list. Canonical and raw modes apply
    /// to the list as one unit here.
    fn render_args(
        &self,
        tys: &[Self::Type],
        values: &[Self::Value],
        cx: &RenderContext,
    ) -> Rendered;

    /// Type of the input node one path step below `ty`.
    ///
    /// Options are transparent: their input is the inner value itself.
    fn child_type(&self, ty: Self::Type, seg: &PathSeg) -> Option<Self::Type>;

    /// Element type when `ty` is a sequence.
    fn element_type(&self, ty: Self::Type) -> Option<Self::Type>;

    /// Whether input for `ty` names exactly one of its fields, as a
    /// variant's does. Stepping into another field changes the selection.
    fn is_choice(&self, _ty: Self::Type) -> bool {
        false
    }

    /// The type written in the family's own syntax.
    fn format_type(&self, ty: Self::Type) -> String;
}

/// What a settled call left behind.
#[derive(Clone, Debug, PartialEq)]
pub enum Output<V> {
    /// The reply values.
    Result(Vec<V>),
    /// The rejection message, verbatim.
    Error(String),
}

impl<V> Output<V> {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Render a call outcome: errors bypass every display mode.
pub fn render_output<E: ValueEngine>(
    engine: &E,
    rets: &[E::Type],
    output: &Output<E::Value>,
    cx: &RenderContext,
) -> Rendered {
    match output {
        Output::Error(msg) => Rendered::new(Body::Error(msg.clone())),
        Output::Result(values) => engine.render_args(rets, values, cx),
    }
}
