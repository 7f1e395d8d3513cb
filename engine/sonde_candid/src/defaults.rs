//! Default inputs.
//!
//! The default for a type is the raw input a freshly opened form starts
//! with. Text-entered leaves (text, principals, numbers) start as strings
//! because that is how their controls hold them until validation.

use serde_json::{Map, Value as Json};
use sonde_stack::ensure_sufficient_stack;

use crate::{Idx, Pool, Tag};

/// Text of the empty principal; the default for principal inputs.
pub const DEFAULT_PRINCIPAL_TEXT: &str = "aaaaa-aa";

impl Pool {
    /// Minimal raw input for `ty`.
    ///
    /// - records and tuples: one default per field
    /// - variants: the first declared field
    /// - `opt`: absent (`null`)
    /// - `vec`: empty
    /// - text and numbers: `""`; principals: `"aaaaa-aa"`; `bool`: `false`
    /// - `null`, `reserved`, `empty`, `func`, `service`: `null`
    ///
    /// Principals start as `aaaaa-aa` rather than blank text: blank text is
    /// not a valid principal, and every default must validate as it stands.
    ///
    /// A recursive type that reaches itself again before hitting an `opt`,
    /// `vec` or a terminating variant field yields `null` at the repeat.
    pub fn default_input(&self, ty: Idx) -> Json {
        let mut active = Vec::new();
        self.default_in(ty, &mut active)
    }

    fn default_in(&self, ty: Idx, active: &mut Vec<Idx>) -> Json {
        ensure_sufficient_stack(|| {
            if self.tag(ty) == Tag::Rec {
                if active.contains(&ty) {
                    return Json::Null;
                }
                active.push(ty);
                let out = self.default_in(self.resolve(ty), active);
                active.pop();
                return out;
            }

            match self.tag(ty) {
                Tag::Record if self.is_tuple(ty) => Json::Array(
                    self.fields(ty)
                        .map(|(_, field)| self.default_in(field, active))
                        .collect(),
                ),
                Tag::Record => Json::Object(
                    self.fields(ty)
                        .map(|(label, field)| (label.key(), self.default_in(field, active)))
                        .collect::<Map<_, _>>(),
                ),
                Tag::Variant => match self.fields(ty).next() {
                    Some((label, field)) => {
                        let mut map = Map::new();
                        map.insert(label.key(), self.default_in(field, active));
                        Json::Object(map)
                    }
                    None => Json::Null,
                },
                Tag::Vec => Json::Array(Vec::new()),
                Tag::Bool => Json::Bool(false),
                Tag::Text
                | Tag::Nat
                | Tag::Int
                | Tag::Nat8
                | Tag::Nat16
                | Tag::Nat32
                | Tag::Nat64
                | Tag::Int8
                | Tag::Int16
                | Tag::Int32
                | Tag::Int64
                | Tag::Float32
                | Tag::Float64 => Json::String(String::new()),
                Tag::Principal => Json::String(DEFAULT_PRINCIPAL_TEXT.to_owned()),
                Tag::Opt
                | Tag::Null
                | Tag::Reserved
                | Tag::Empty
                | Tag::Func
                | Tag::Service
                | Tag::Rec => Json::Null,
            }
        })
    }
}
