//! Type kind tags.
//!
//! Each pool item carries a [`Tag`] that says how to read its `data` word:
//!
//! - 0-17: primitives (data unused; the tag equals the fixed `Idx`)
//! - 32-33: single-child containers (data = child `Idx`)
//! - 48-51: field-list types (data = offset into `extra`)
//! - 80: recursive reference (data = rec slot)

/// Type kind discriminant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Tag {
    // === Primitives (0-17) ===
    Null = 0,
    Bool = 1,
    /// Unbounded natural number.
    Nat = 2,
    /// Unbounded integer.
    Int = 3,
    Nat8 = 4,
    Nat16 = 5,
    Nat32 = 6,
    Nat64 = 7,
    Int8 = 8,
    Int16 = 9,
    Int32 = 10,
    Int64 = 11,
    Float32 = 12,
    Float64 = 13,
    Text = 14,
    /// Top type; any value, ignored by the receiver.
    Reserved = 15,
    /// Bottom type; no values.
    Empty = 16,
    Principal = 17,

    // === Single-Child Containers (32-47) ===
    /// `opt T`.
    Opt = 32,
    /// `vec T`.
    Vec = 33,

    // === Field Lists (48-79) ===
    // extra: [count, label0, ty0, label1, ty1, ...]
    /// `record { ... }`, including tuples.
    Record = 48,
    /// `variant { ... }`.
    Variant = 49,
    /// `func (args) -> (rets) modes`.
    /// extra: [arg_count, args.., ret_count, rets.., mode_bits]
    Func = 50,
    /// `service { method : func ...; }`.
    Service = 51,

    // === Recursion (80-95) ===
    /// Named recursive reference; resolved lazily through the pool.
    Rec = 80,
}

impl Tag {
    /// Whether items with this tag keep their payload in `extra`.
    #[inline]
    pub const fn uses_extra(self) -> bool {
        matches!(
            self,
            Self::Record | Self::Variant | Self::Func | Self::Service
        )
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) < 32
    }

    /// Bit width of a fixed-width integer tag.
    pub const fn bits(self) -> Option<u32> {
        match self {
            Self::Nat8 | Self::Int8 => Some(8),
            Self::Nat16 | Self::Int16 => Some(16),
            Self::Nat32 | Self::Int32 | Self::Float32 => Some(32),
            Self::Nat64 | Self::Int64 | Self::Float64 => Some(64),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_fixed_nat(self) -> bool {
        matches!(self, Self::Nat8 | Self::Nat16 | Self::Nat32 | Self::Nat64)
    }

    #[inline]
    pub const fn is_fixed_int(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Integer of any width, fixed or unbounded.
    #[inline]
    pub const fn is_integer(self) -> bool {
        self.is_fixed_nat() || self.is_fixed_int() || matches!(self, Self::Nat | Self::Int)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Integer or float.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Tag of the primitive at a fixed index.
    pub const fn primitive(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::Null,
            1 => Self::Bool,
            2 => Self::Nat,
            3 => Self::Int,
            4 => Self::Nat8,
            5 => Self::Nat16,
            6 => Self::Nat32,
            7 => Self::Nat64,
            8 => Self::Int8,
            9 => Self::Int16,
            10 => Self::Int32,
            11 => Self::Int64,
            12 => Self::Float32,
            13 => Self::Float64,
            14 => Self::Text,
            15 => Self::Reserved,
            16 => Self::Empty,
            17 => Self::Principal,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests;
