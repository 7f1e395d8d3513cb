//! The type pool.
//!
//! All Candid types of a service description live in one [`Pool`]:
//! items are `(tag, data)` pairs, variable-length payloads (field lists,
//! function signatures) live in a shared `extra` array, and field labels are
//! stored once in a label table. Primitive types are pre-interned at the
//! fixed indices named by [`Idx`]; compound types are hash-consed so equal
//! types share one index.
//!
//! Recursive types go through `Rec` items. A `Rec` is a named placeholder
//! created before its definition and bound afterwards, so a type can refer to
//! itself without the pool ever holding an expanded, infinite structure.
//! [`Pool::resolve`] follows a `Rec` to its definition on demand.

mod construct;
mod format;

use bitflags::bitflags;
use num_bigint::BigInt;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{Idx, Label, Tag};

bitflags! {
    /// Function annotations.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FuncModes: u32 {
        /// Read-only call answered by a single replica.
        const QUERY = 1;
        /// Fire-and-forget call with no reply.
        const ONEWAY = 1 << 1;
        /// Query that may call other queries.
        const COMPOSITE_QUERY = 1 << 2;
    }
}

impl FuncModes {
    /// Read-only methods are labeled "Query" in the UI, the rest "Call".
    pub fn is_read_only(self) -> bool {
        self.intersects(Self::QUERY | Self::COMPOSITE_QUERY)
    }
}

/// Errors from building a pool out of untrusted descriptions.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("duplicate field label `{0}`")]
    DuplicateLabel(Label),
    #[error("{0:?} is not a recursive placeholder")]
    NotRec(Idx),
    #[error("recursive type `{0}` is already bound")]
    AlreadyBound(String),
}

/// A single pool entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Item {
    tag: Tag,
    data: u32,
}

#[derive(Clone, Debug)]
struct RecSlot {
    name: String,
    target: Idx,
}

/// Arena of Candid types.
#[derive(Clone, Debug)]
pub struct Pool {
    items: Vec<Item>,
    extra: Vec<u32>,
    labels: Vec<Label>,
    label_ids: FxHashMap<Label, u32>,
    interned: FxHashMap<(Tag, u32), Idx>,
    interned_complex: FxHashMap<(Tag, Vec<u32>), Idx>,
    recs: Vec<RecSlot>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool holding only the primitive types.
    pub fn new() -> Self {
        let mut items = Vec::with_capacity(64);
        for raw in 0..Idx::PRIMITIVE_COUNT {
            if let Some(tag) = Tag::primitive(raw) {
                items.push(Item { tag, data: 0 });
            }
        }
        Self {
            items,
            extra: Vec::new(),
            labels: Vec::new(),
            label_ids: FxHashMap::default(),
            interned: FxHashMap::default(),
            interned_complex: FxHashMap::default(),
            recs: Vec::new(),
        }
    }

    /// Number of types in the pool, primitives included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // === Raw Access ===

    /// Tag of `idx`, without following recursive references.
    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.items[idx.raw() as usize].tag
    }

    #[inline]
    fn data(&self, idx: Idx) -> u32 {
        self.items[idx.raw() as usize].data
    }

    // === Interning ===

    #[allow(
        clippy::cast_possible_truncation,
        reason = "pool indices are u32"
    )]
    fn push(&mut self, tag: Tag, data: u32) -> Idx {
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(Item { tag, data });
        idx
    }

    fn intern(&mut self, tag: Tag, data: u32) -> Idx {
        if let Some(&idx) = self.interned.get(&(tag, data)) {
            return idx;
        }
        let idx = self.push(tag, data);
        self.interned.insert((tag, data), idx);
        idx
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "extra offsets are u32"
    )]
    fn intern_complex(&mut self, tag: Tag, words: &[u32]) -> Idx {
        let key = (tag, words.to_vec());
        if let Some(&idx) = self.interned_complex.get(&key) {
            return idx;
        }
        let start = self.extra.len() as u32;
        self.extra.extend_from_slice(words);
        let idx = self.push(tag, start);
        self.interned_complex.insert(key, idx);
        idx
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "label table indices are u32"
    )]
    fn label_slot(&mut self, label: &Label) -> u32 {
        if let Some(&slot) = self.label_ids.get(label) {
            return slot;
        }
        let slot = self.labels.len() as u32;
        self.labels.push(label.clone());
        self.label_ids.insert(label.clone(), slot);
        slot
    }

    // === Recursion ===

    /// Follow recursive references until a concrete type.
    ///
    /// An unbound placeholder, or a cycle made only of placeholders, has no
    /// values and resolves to `empty`.
    pub fn resolve(&self, mut idx: Idx) -> Idx {
        for _ in 0..=self.recs.len() {
            if idx.is_none() {
                return Idx::EMPTY;
            }
            if self.tag(idx) != Tag::Rec {
                return idx;
            }
            idx = self.recs[self.data(idx) as usize].target;
        }
        Idx::EMPTY
    }

    /// Tag of `idx` after following recursive references.
    #[inline]
    pub fn resolved_tag(&self, idx: Idx) -> Tag {
        self.tag(self.resolve(idx))
    }

    /// Name of a recursive placeholder.
    pub fn rec_name(&self, idx: Idx) -> Option<&str> {
        (self.tag(idx) == Tag::Rec).then(|| self.recs[self.data(idx) as usize].name.as_str())
    }

    // === Accessors ===

    /// Child of an `opt` or `vec`.
    pub fn inner(&self, idx: Idx) -> Option<Idx> {
        matches!(self.tag(idx), Tag::Opt | Tag::Vec).then(|| Idx::from_raw(self.data(idx)))
    }

    fn field_words(&self, idx: Idx) -> &[u32] {
        if !matches!(self.tag(idx), Tag::Record | Tag::Variant | Tag::Service) {
            return &[];
        }
        let start = self.data(idx) as usize;
        let count = self.extra[start] as usize;
        &self.extra[start + 1..start + 1 + 2 * count]
    }

    /// Fields of a record or variant (methods of a service), in declaration
    /// order. Empty for any other type.
    pub fn fields(&self, idx: Idx) -> impl ExactSizeIterator<Item = (&Label, Idx)> + '_ {
        self.field_words(idx)
            .chunks_exact(2)
            .map(|pair| (&self.labels[pair[0] as usize], Idx::from_raw(pair[1])))
    }

    /// Field selected by raw-input key `key`.
    pub fn field_by_key(&self, idx: Idx, key: &str) -> Option<(&Label, Idx)> {
        self.fields(idx).find(|(label, _)| label.matches_key(key))
    }

    /// Field matching `label` by wire id.
    pub fn field_by_label(&self, idx: Idx, label: &Label) -> Option<(&Label, Idx)> {
        self.fields(idx).find(|(l, _)| l.same_field(label))
    }

    /// A record whose labels are exactly the positions `0..n`.
    pub fn is_tuple(&self, idx: Idx) -> bool {
        self.tag(idx) == Tag::Record
            && self.fields(idx).len() > 0
            && self
                .fields(idx)
                .enumerate()
                .all(|(i, (label, _))| matches!(label, Label::Unnamed(n) if *n as usize == i))
    }

    /// `vec nat8`, the byte vector.
    pub fn is_blob(&self, idx: Idx) -> bool {
        let idx = self.resolve(idx);
        self.tag(idx) == Tag::Vec
            && self
                .inner(idx)
                .is_some_and(|elem| self.resolved_tag(elem) == Tag::Nat8)
    }

    fn func_words(&self, idx: Idx) -> Option<(&[u32], &[u32], FuncModes)> {
        if self.tag(idx) != Tag::Func {
            return None;
        }
        let start = self.data(idx) as usize;
        let arg_count = self.extra[start] as usize;
        let args = &self.extra[start + 1..start + 1 + arg_count];
        let rets_at = start + 1 + arg_count;
        let ret_count = self.extra[rets_at] as usize;
        let rets = &self.extra[rets_at + 1..rets_at + 1 + ret_count];
        let modes = FuncModes::from_bits_truncate(self.extra[rets_at + 1 + ret_count]);
        Some((args, rets, modes))
    }

    /// Argument types of a function.
    pub fn func_args(&self, idx: Idx) -> Vec<Idx> {
        self.func_words(idx)
            .map(|(args, _, _)| args.iter().copied().map(Idx::from_raw).collect())
            .unwrap_or_default()
    }

    /// Return types of a function.
    pub fn func_rets(&self, idx: Idx) -> Vec<Idx> {
        self.func_words(idx)
            .map(|(_, rets, _)| rets.iter().copied().map(Idx::from_raw).collect())
            .unwrap_or_default()
    }

    pub fn func_modes(&self, idx: Idx) -> FuncModes {
        self.func_words(idx)
            .map(|(_, _, modes)| modes)
            .unwrap_or_default()
    }

    /// Inclusive range of a fixed-width integer type.
    ///
    /// The bounds are advisory: form controls show them, validation does not
    /// enforce them.
    pub fn int_bounds(&self, idx: Idx) -> Option<(BigInt, BigInt)> {
        let tag = self.resolved_tag(idx);
        let bits = tag.bits()?;
        if tag.is_fixed_nat() {
            Some((BigInt::from(0), (BigInt::from(1) << bits) - 1))
        } else if tag.is_fixed_int() {
            let half = BigInt::from(1) << (bits - 1);
            Some((-half.clone(), half - 1))
        } else {
            None
        }
    }

    /// Hint text when `n` lies outside the range of a fixed-width type.
    pub fn bounds_hint(&self, idx: Idx, n: &BigInt) -> Option<String> {
        let (min, max) = self.int_bounds(idx)?;
        (n < &min || n > &max).then(|| {
            format!(
                "{n} is outside the {} range {min}..={max}",
                self.format_type(idx)
            )
        })
    }
}
