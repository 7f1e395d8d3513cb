//! Type handles.
//!
//! Every Candid type lives in a [`Pool`](crate::Pool) and is referred to by a
//! 32-bit [`Idx`]. Primitive types sit at fixed indices so code can name them
//! as constants without touching the pool.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-17) ===
    // Pre-interned at pool creation; the index equals the tag value.

    pub const NULL: Self = Self(0);
    pub const BOOL: Self = Self(1);
    pub const NAT: Self = Self(2);
    pub const INT: Self = Self(3);
    pub const NAT8: Self = Self(4);
    pub const NAT16: Self = Self(5);
    pub const NAT32: Self = Self(6);
    pub const NAT64: Self = Self(7);
    pub const INT8: Self = Self(8);
    pub const INT16: Self = Self(9);
    pub const INT32: Self = Self(10);
    pub const INT64: Self = Self(11);
    pub const FLOAT32: Self = Self(12);
    pub const FLOAT64: Self = Self(13);
    pub const TEXT: Self = Self(14);
    pub const RESERVED: Self = Self(15);
    pub const EMPTY: Self = Self(16);
    pub const PRINCIPAL: Self = Self(17);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 18;

    /// First index handed out for compound types.
    pub const FIRST_DYNAMIC: u32 = Self::PRIMITIVE_COUNT;

    /// Sentinel for "no type", used by unbound recursive placeholders.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Candid keyword for primitive types, `None` for compound ones.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("null"),
            1 => Some("bool"),
            2 => Some("nat"),
            3 => Some("int"),
            4 => Some("nat8"),
            5 => Some("nat16"),
            6 => Some("nat32"),
            7 => Some("nat64"),
            8 => Some("int8"),
            9 => Some("int16"),
            10 => Some("int32"),
            11 => Some("int64"),
            12 => Some("float32"),
            13 => Some("float64"),
            14 => Some("text"),
            15 => Some("reserved"),
            16 => Some("empty"),
            17 => Some("principal"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.is_none()) {
            (Some(name), _) => write!(f, "Idx::{}", name.to_ascii_uppercase()),
            (None, true) => f.write_str("Idx::NONE"),
            (None, false) => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.is_none()) {
            (Some(name), _) => f.write_str(name),
            (None, true) => f.write_str("<none>"),
            (None, false) => write!(f, "type#{}", self.0),
        }
    }
}

const _: () = assert!(std::mem::size_of::<Idx>() == 4);

#[cfg(test)]
mod tests;
