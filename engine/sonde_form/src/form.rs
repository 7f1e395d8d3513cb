//! The per-method form state machine.
//!
//! ```text
//!   Idle --edit--> Editing --begin_submit--> Submitting --complete--> Idle
//!    |                ^            |
//!    |                +--invalid---+
//!    +--------------begin_submit-------------^
//! ```
//!
//! Input and errors for all arguments live in one tree each, addressed by
//! paths that start with the argument position.

use std::future::Future;

use serde_json::{Map, Value as Json};
use sonde_ir::{
    display_path, render_output, ErrorTree, Output, PathSeg, RawValue, RenderContext, Rendered,
    ValueEngine,
};
use tracing::debug;

use crate::input_tree;
use crate::FormError;

/// Whether a method reads or changes state. Only the button label differs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CallMode {
    Query,
    #[default]
    Update,
}

impl CallMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Update => "Call",
        }
    }
}

/// A method's name, argument and return types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSignature<T> {
    pub name: String,
    pub args: Vec<T>,
    pub rets: Vec<T>,
    pub mode: CallMode,
}

impl<T> MethodSignature<T> {
    pub fn new(name: impl Into<String>, args: Vec<T>, rets: Vec<T>, mode: CallMode) -> Self {
        Self {
            name: name.into(),
            args,
            rets,
            mode,
        }
    }
}

/// Where a form is in its lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormState {
    /// Nothing touched since the form opened or the last call settled.
    #[default]
    Idle,
    /// At least one field edited.
    Editing,
    /// A call is in flight.
    Submitting,
}

/// The invocation capability: calls a method with validated arguments.
///
/// A rejection of any kind (transport failure, canister trap, decode
/// error) comes back as its message.
pub trait Caller<V> {
    fn call(
        &self,
        method: &str,
        mode: CallMode,
        args: Vec<V>,
    ) -> impl Future<Output = Result<Vec<V>, String>>;
}

/// Form state for one method.
pub struct MethodForm<'e, E: ValueEngine> {
    engine: &'e E,
    signature: MethodSignature<E::Type>,
    inputs: RawValue,
    errors: Option<ErrorTree>,
    state: FormState,
    output: Option<Output<E::Value>>,
}

impl<'e, E: ValueEngine> MethodForm<'e, E> {
    /// Open a form with every argument at its default input.
    pub fn open(engine: &'e E, signature: MethodSignature<E::Type>) -> Self {
        let inputs = Json::Array(
            signature
                .args
                .iter()
                .map(|&ty| engine.default_input(ty))
                .collect(),
        );
        debug!(method = %signature.name, arity = signature.args.len(), "form opened");
        Self {
            engine,
            signature,
            inputs,
            errors: None,
            state: FormState::Idle,
            output: None,
        }
    }

    // === Accessors ===

    pub fn signature(&self) -> &MethodSignature<E::Type> {
        &self.signature
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// The argument list as one array.
    pub fn inputs(&self) -> &RawValue {
        &self.inputs
    }

    pub fn input_at(&self, path: &[PathSeg]) -> Option<&RawValue> {
        input_tree::get_at(&self.inputs, path)
    }

    /// All current errors, keyed by argument position.
    pub fn errors(&self) -> Option<&ErrorTree> {
        self.errors.as_ref()
    }

    pub fn error_at(&self, path: &[PathSeg]) -> Option<&ErrorTree> {
        self.errors.as_ref()?.get(path)
    }

    /// The outcome of the last settled call.
    pub fn output(&self) -> Option<&Output<E::Value>> {
        self.output.as_ref()
    }

    /// Type of the input node at `path`.
    pub fn type_at(&self, path: &[PathSeg]) -> Option<E::Type> {
        let (PathSeg::Index(arg), rest) = path.split_first()? else {
            return None;
        };
        let root = *self.signature.args.get(*arg)?;
        rest.iter()
            .try_fold(root, |ty, seg| self.engine.child_type(ty, seg))
    }

    // === Editing ===

    /// Set the input at `path` and re-validate that subtree only. Errors
    /// elsewhere in the form are untouched.
    ///
    /// When the edit has to rebuild an ancestor (a container of the wrong
    /// shape, a missing array slot, or a variant switching to another
    /// field), the subtree from that ancestor down is re-validated instead.
    #[tracing::instrument(level = "debug", skip(self, path, raw), fields(method = %self.signature.name, path = %display_path(path)))]
    pub fn edit(&mut self, path: &[PathSeg], raw: RawValue) -> Result<(), FormError> {
        let ty = self
            .type_at(path)
            .ok_or_else(|| FormError::UnknownPath(display_path(path)))?;
        let anchor = self.rebuild_point(path);
        input_tree::set_at(&mut self.inputs, path, raw);

        let scope = &path[..anchor];
        let scope_ty = if anchor == path.len() {
            ty
        } else {
            debug!(scope = %display_path(scope), "ancestor rebuilt, widening re-validation");
            self.type_at(scope)
                .ok_or_else(|| FormError::UnknownPath(display_path(scope)))?
        };
        let error = input_tree::get_at(&self.inputs, scope)
            .map_or_else(
                || self.engine.validate(scope_ty, &Json::Null),
                |input| self.engine.validate(scope_ty, input),
            )
            .err()
            .map(|rejected| rejected.error);
        ErrorTree::set_at(&mut self.errors, scope, error);
        self.touch();
        Ok(())
    }

    /// Length of the longest prefix of `path` whose input nodes already
    /// had the shape the edit needs.
    ///
    /// Nodes of the wrong shape are replaced by their type's default input
    /// on the way down. A variant stepped into through an unselected field
    /// is cleared so the edit selects that field.
    fn rebuild_point(&mut self, path: &[PathSeg]) -> usize {
        let mut anchor = None;
        // The argument list itself always fits its own positions.
        for i in 1..path.len() {
            let prefix = &path[..i];
            let choice = self
                .type_at(prefix)
                .is_some_and(|ty| self.engine.is_choice(ty));
            let (fits, rebuilt) = match (input_tree::get_at(&self.inputs, prefix), &path[i]) {
                (Some(Json::Object(map)), PathSeg::Field(key)) => {
                    if choice && !(map.len() == 1 && map.contains_key(key)) {
                        (false, Some(Json::Object(Map::new())))
                    } else {
                        (true, None)
                    }
                }
                (Some(Json::Array(items)), PathSeg::Index(j)) => (*j < items.len(), None),
                _ if choice => (false, Some(Json::Object(Map::new()))),
                _ => (
                    false,
                    self.type_at(prefix).map(|ty| self.engine.default_input(ty)),
                ),
            };
            if let Some(node) = rebuilt {
                input_tree::set_at(&mut self.inputs, prefix, node);
            }
            if !fits && anchor.is_none() {
                anchor = Some(i);
            }
        }
        anchor.unwrap_or(path.len())
    }

    /// Append a default element to the sequence at `path`.
    pub fn push_element(&mut self, path: &[PathSeg]) -> Result<usize, FormError> {
        let ty = self
            .type_at(path)
            .ok_or_else(|| FormError::UnknownPath(display_path(path)))?;
        let elem = self
            .engine
            .element_type(ty)
            .ok_or_else(|| FormError::NotASequence(display_path(path)))?;
        let index = input_tree::push_at(&mut self.inputs, path, self.engine.default_input(elem));
        debug!(method = %self.signature.name, path = %display_path(path), index, "element added");
        self.touch();
        Ok(index)
    }

    /// Delete element `index` of the sequence at `path`. Later elements
    /// move down by one, and so do their errors.
    pub fn remove_element(&mut self, path: &[PathSeg], index: usize) -> Result<(), FormError> {
        let ty = self
            .type_at(path)
            .ok_or_else(|| FormError::UnknownPath(display_path(path)))?;
        if self.engine.element_type(ty).is_none() {
            return Err(FormError::NotASequence(display_path(path)));
        }
        let len = self
            .input_at(path)
            .and_then(Json::as_array)
            .map_or(0, Vec::len);
        if input_tree::remove_index_at(&mut self.inputs, path, index).is_none() {
            return Err(FormError::IndexOutOfRange {
                path: display_path(path),
                index,
                len,
            });
        }
        ErrorTree::remove_index_at(&mut self.errors, path, index);
        debug!(method = %self.signature.name, path = %display_path(path), index, "element removed");
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        if self.state == FormState::Idle {
            self.state = FormState::Editing;
        }
    }

    // === Submission ===

    /// Validate every argument and enter `Submitting`.
    ///
    /// On failure the form goes back to `Editing` with the complete error
    /// tree, replacing whatever per-edit errors it held.
    pub fn begin_submit(&mut self) -> Result<Vec<E::Value>, FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::InFlight(self.signature.name.clone()));
        }

        let null = Json::Null;
        let mut values = Vec::with_capacity(self.signature.args.len());
        let mut errors = Vec::new();
        for (i, &ty) in self.signature.args.iter().enumerate() {
            let input = input_tree::get_at(&self.inputs, &[PathSeg::Index(i)]).unwrap_or(&null);
            match self.engine.validate(ty, input) {
                Ok(value) => values.push(value),
                Err(rejected) => {
                    errors.resize(i + 1, None);
                    errors[i] = Some(rejected.error);
                }
            }
        }

        if errors.is_empty() {
            self.errors = None;
            self.state = FormState::Submitting;
            debug!(method = %self.signature.name, "submitting");
            Ok(values)
        } else {
            let tree = ErrorTree::Elements(errors);
            debug!(method = %self.signature.name, errors = %tree, "submission blocked");
            self.errors = Some(tree.clone());
            self.state = FormState::Editing;
            Err(FormError::Invalid(tree))
        }
    }

    /// Record the settled call and return to `Idle`.
    pub fn complete(&mut self, result: Result<Vec<E::Value>, String>) -> &Output<E::Value> {
        let output = match result {
            Ok(values) => Output::Result(values),
            Err(msg) => Output::Error(msg),
        };
        debug!(method = %self.signature.name, failed = output.is_error(), "call settled");
        self.state = FormState::Idle;
        self.output.insert(output)
    }

    /// Validate, call and record the outcome. Call failures become an
    /// error output, never an `Err`.
    pub async fn submit<C: Caller<E::Value>>(
        &mut self,
        caller: &C,
    ) -> Result<&Output<E::Value>, FormError> {
        let args = self.begin_submit()?;
        let result = caller
            .call(&self.signature.name, self.signature.mode, args)
            .await;
        Ok(self.complete(result))
    }

    /// Render the last outcome for the return types.
    pub fn render_output(&self, cx: &RenderContext) -> Option<Rendered> {
        let output = self.output.as_ref()?;
        Some(render_output(self.engine, &self.signature.rets, output, cx))
    }
}

#[cfg(test)]
mod tests;
