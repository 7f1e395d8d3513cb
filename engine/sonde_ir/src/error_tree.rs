//! Structured validation errors.
//!
//! An [`ErrorTree`] mirrors the shape of the input it describes: records and
//! variants become keyed maps, vectors and tuples become position-aligned
//! arrays, and leaves carry the message of whatever rejected them. Trees are
//! edited in place by path so a form can replace the errors of one subtree
//! without disturbing its siblings.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::path::{display_path, Path, PathSeg};

/// Validation error for one node of an input tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorTree {
    /// The node itself was rejected.
    Message(String),
    /// Errors of named children, in declaration order. Only failing
    /// children appear. A variant error is a single-entry map keyed by the
    /// selected field.
    Fields(Vec<(String, ErrorTree)>),
    /// Errors of positional children. `None` marks a child that passed.
    Elements(Vec<Option<ErrorTree>>),
}

/// Result of validating raw input against a type.
pub type Validated<V> = Result<V, Rejected<V>>;

/// A failed validation.
///
/// Records keep the fields that did coerce in `partial`; every other node
/// rejects as a whole and leaves it empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejected<V> {
    pub error: ErrorTree,
    pub partial: Option<V>,
}

impl<V> Rejected<V> {
    /// Reject with a flat message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            error: ErrorTree::Message(msg.into()),
            partial: None,
        }
    }

    /// Reject with a structured error.
    pub fn new(error: ErrorTree) -> Self {
        Self {
            error,
            partial: None,
        }
    }

    /// Reject with a structured error, keeping the coerced remainder.
    pub fn with_partial(error: ErrorTree, partial: V) -> Self {
        Self {
            error,
            partial: Some(partial),
        }
    }

    /// Convert the partial value into another family's value type.
    pub fn map_partial<U>(self, f: impl FnOnce(V) -> U) -> Rejected<U> {
        Rejected {
            error: self.error,
            partial: self.partial.map(f),
        }
    }
}

impl ErrorTree {
    /// Build a leaf message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    /// Wrap an error under a single key (the shape of a variant error).
    pub fn keyed(key: impl Into<String>, error: ErrorTree) -> Self {
        Self::Fields(vec![(key.into(), error)])
    }

    /// The error stored exactly at `path`, if any.
    pub fn get(&self, path: &[PathSeg]) -> Option<&ErrorTree> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self);
        };
        match (self, head) {
            (Self::Fields(fields), PathSeg::Field(key)) => fields
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, child)| child.get(rest)),
            (Self::Elements(elems), PathSeg::Index(i)) => {
                elems.get(*i).and_then(Option::as_ref)?.get(rest)
            }
            _ => None,
        }
    }

    /// Replace the subtree at `path` inside `slot`.
    ///
    /// `None` clears it. Containers left without any error collapse to
    /// `None` so a fully corrected form ends up with no error tree at all.
    /// A node whose shape does not fit the next segment (a leaf message
    /// above a field, say) is replaced by a container of the right shape.
    pub fn set_at(slot: &mut Option<ErrorTree>, path: &[PathSeg], value: Option<ErrorTree>) {
        let Some((head, rest)) = path.split_first() else {
            *slot = value;
            return;
        };
        if slot.is_none() && value.is_none() {
            return;
        }

        match head {
            PathSeg::Field(key) => {
                if !matches!(slot, Some(Self::Fields(_))) {
                    if value.is_none() {
                        return;
                    }
                    *slot = Some(Self::Fields(Vec::new()));
                }
                let Some(Self::Fields(fields)) = slot else {
                    return;
                };
                let pos = fields.iter().position(|(k, _)| k == key);
                let mut child =
                    pos.map(|p| std::mem::replace(&mut fields[p].1, Self::Fields(Vec::new())));
                Self::set_at(&mut child, rest, value);
                match (pos, child) {
                    (Some(p), Some(c)) => fields[p].1 = c,
                    (Some(p), None) => {
                        fields.remove(p);
                    }
                    (None, Some(c)) => fields.push((key.clone(), c)),
                    (None, None) => {}
                }
            }
            PathSeg::Index(index) => {
                if !matches!(slot, Some(Self::Elements(_))) {
                    if value.is_none() {
                        return;
                    }
                    *slot = Some(Self::Elements(Vec::new()));
                }
                let Some(Self::Elements(elems)) = slot else {
                    return;
                };
                if *index >= elems.len() {
                    if value.is_none() {
                        return;
                    }
                    elems.resize(*index + 1, None);
                }
                Self::set_at(&mut elems[*index], rest, value);
            }
        }
        Self::collapse(slot);
    }

    /// Remove position `index` of the array at `path`, shifting later
    /// positions down by one.
    pub fn remove_index_at(slot: &mut Option<ErrorTree>, path: &[PathSeg], index: usize) {
        let Some(node) = slot.as_mut() else {
            return;
        };
        match path.split_first() {
            None => {
                if let Self::Elements(elems) = node {
                    if index < elems.len() {
                        elems.remove(index);
                    }
                }
            }
            Some((PathSeg::Field(key), rest)) => {
                if let Self::Fields(fields) = node {
                    if let Some(pos) = fields.iter().position(|(k, _)| k == key) {
                        let mut child = Some(std::mem::replace(
                            &mut fields[pos].1,
                            Self::Fields(Vec::new()),
                        ));
                        Self::remove_index_at(&mut child, rest, index);
                        match child {
                            Some(c) => fields[pos].1 = c,
                            None => {
                                fields.remove(pos);
                            }
                        }
                    }
                }
            }
            Some((PathSeg::Index(i), rest)) => {
                if let Self::Elements(elems) = node {
                    if let Some(child) = elems.get_mut(*i) {
                        Self::remove_index_at(child, rest, index);
                    }
                }
            }
        }
        Self::collapse(slot);
    }

    /// Every leaf message with the path that leads to it.
    pub fn leaves(&self) -> Vec<(Path, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Path::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Path, out: &mut Vec<(Path, &'a str)>) {
        match self {
            Self::Message(msg) => out.push((prefix.clone(), msg.as_str())),
            Self::Fields(fields) => {
                for (key, child) in fields {
                    prefix.push(PathSeg::Field(key.clone()));
                    child.collect_leaves(prefix, out);
                    prefix.pop();
                }
            }
            Self::Elements(elems) => {
                for (i, child) in elems.iter().enumerate() {
                    if let Some(child) = child {
                        prefix.push(PathSeg::Index(i));
                        child.collect_leaves(prefix, out);
                        prefix.pop();
                    }
                }
            }
        }
    }

    fn is_clear(&self) -> bool {
        match self {
            Self::Message(_) => false,
            Self::Fields(fields) => fields.is_empty(),
            Self::Elements(elems) => elems.iter().all(Option::is_none),
        }
    }

    fn collapse(slot: &mut Option<ErrorTree>) {
        if let Some(Self::Elements(elems)) = slot {
            while matches!(elems.last(), Some(None)) {
                elems.pop();
            }
        }
        if slot.as_ref().is_some_and(Self::is_clear) {
            *slot = None;
        }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, msg)) in self.leaves().into_iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if path.is_empty() {
                f.write_str(msg)?;
            } else {
                write!(f, "{}: {msg}", display_path(&path))?;
            }
        }
        Ok(())
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Message(msg) => serializer.serialize_str(msg),
            Self::Fields(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, child) in fields {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
            Self::Elements(elems) => {
                let mut seq = serializer.serialize_seq(Some(elems.len()))?;
                for child in elems {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
        }
    }
}
