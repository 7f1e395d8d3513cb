//! Type construction helpers for the Pool.

use rustc_hash::FxHashSet;

use super::{FuncModes, Item, Pool, PoolError, RecSlot};
use crate::{Idx, Label, Tag};

impl Pool {
    // === Single-Child Containers ===

    /// Create `opt inner`.
    pub fn opt(&mut self, inner: Idx) -> Idx {
        self.intern(Tag::Opt, inner.raw())
    }

    /// Create `vec elem`.
    pub fn vec(&mut self, elem: Idx) -> Idx {
        self.intern(Tag::Vec, elem.raw())
    }

    /// Create `blob`, i.e. `vec nat8`.
    pub fn blob(&mut self) -> Idx {
        self.vec(Idx::NAT8)
    }

    // === Field Lists ===

    /// Create a record type. Labels must be unique.
    pub fn record(&mut self, fields: &[(Label, Idx)]) -> Idx {
        debug_assert!(unique_labels(fields).is_ok(), "duplicate record label");
        self.field_list(Tag::Record, fields)
    }

    /// Create a record type with named fields.
    pub fn record_named(&mut self, fields: &[(&str, Idx)]) -> Idx {
        let fields = named(fields);
        self.record(&fields)
    }

    /// Create a tuple: a record labeled by position.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "tuple arity fits u32"
    )]
    pub fn tuple(&mut self, elems: &[Idx]) -> Idx {
        let fields: Vec<_> = elems
            .iter()
            .enumerate()
            .map(|(i, &ty)| (Label::Unnamed(i as u32), ty))
            .collect();
        self.record(&fields)
    }

    /// Create a variant type. Labels must be unique.
    pub fn variant(&mut self, fields: &[(Label, Idx)]) -> Idx {
        debug_assert!(unique_labels(fields).is_ok(), "duplicate variant label");
        self.field_list(Tag::Variant, fields)
    }

    /// Create a variant type with named fields.
    pub fn variant_named(&mut self, fields: &[(&str, Idx)]) -> Idx {
        let fields = named(fields);
        self.variant(&fields)
    }

    /// Create a record, rejecting duplicate labels.
    pub fn try_record(&mut self, fields: &[(Label, Idx)]) -> Result<Idx, PoolError> {
        unique_labels(fields)?;
        Ok(self.field_list(Tag::Record, fields))
    }

    /// Create a variant, rejecting duplicate labels.
    pub fn try_variant(&mut self, fields: &[(Label, Idx)]) -> Result<Idx, PoolError> {
        unique_labels(fields)?;
        Ok(self.field_list(Tag::Variant, fields))
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "pool layout stores field counts as u32 words"
    )]
    fn field_list(&mut self, tag: Tag, fields: &[(Label, Idx)]) -> Idx {
        // Layout: [count, label0, ty0, label1, ty1, ...]
        let mut extra = Vec::with_capacity(fields.len() * 2 + 1);
        extra.push(fields.len() as u32);
        for (label, ty) in fields {
            extra.push(self.label_slot(label));
            extra.push(ty.raw());
        }
        self.intern_complex(tag, &extra)
    }

    // === Functions and Services ===

    /// Create `func (args) -> (rets) modes`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "pool layout stores arities as u32 words"
    )]
    pub fn func(&mut self, args: &[Idx], rets: &[Idx], modes: FuncModes) -> Idx {
        // Layout: [arg_count, args.., ret_count, rets.., mode_bits]
        let mut extra = Vec::with_capacity(args.len() + rets.len() + 3);
        extra.push(args.len() as u32);
        extra.extend(args.iter().map(|a| a.raw()));
        extra.push(rets.len() as u32);
        extra.extend(rets.iter().map(|r| r.raw()));
        extra.push(modes.bits());
        self.intern_complex(Tag::Func, &extra)
    }

    /// Create a service from `(method name, func type)` pairs.
    pub fn service(&mut self, methods: &[(&str, Idx)]) -> Idx {
        let methods = named(methods);
        self.field_list(Tag::Service, &methods)
    }

    // === Recursion ===

    /// Create an unbound recursive placeholder named `name`.
    ///
    /// Placeholders are never hash-consed: two `rec("List")` calls make two
    /// distinct types.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rec slot count fits u32"
    )]
    pub fn rec(&mut self, name: impl Into<String>) -> Idx {
        let slot = self.recs.len() as u32;
        self.recs.push(RecSlot {
            name: name.into(),
            target: Idx::NONE,
        });
        self.push(Tag::Rec, slot)
    }

    /// Bind a placeholder to its definition.
    pub fn bind_rec(&mut self, rec: Idx, target: Idx) -> Result<(), PoolError> {
        let Item { tag, data } = self.items[rec.raw() as usize];
        if tag != Tag::Rec {
            return Err(PoolError::NotRec(rec));
        }
        let slot = &mut self.recs[data as usize];
        if !slot.target.is_none() {
            return Err(PoolError::AlreadyBound(slot.name.clone()));
        }
        slot.target = target;
        Ok(())
    }
}

fn named(fields: &[(&str, Idx)]) -> Vec<(Label, Idx)> {
    fields
        .iter()
        .map(|&(name, ty)| (Label::named(name), ty))
        .collect()
}

fn unique_labels(fields: &[(Label, Idx)]) -> Result<(), PoolError> {
    let mut seen = FxHashSet::default();
    for (label, _) in fields {
        if !seen.insert(label.id()) {
            return Err(PoolError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}
