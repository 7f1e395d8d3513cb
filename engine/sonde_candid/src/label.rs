//! Record and variant field labels.

use std::fmt;

/// Label of a record or variant field.
///
/// Candid identifies fields on the wire by a 32-bit hash of their name, so
/// labels compare by [`Label::id`] when matching values against types.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// A named field.
    Named(String),
    /// A field known only by its numeric id.
    Id(u32),
    /// A positional tuple component.
    Unnamed(u32),
}

impl Label {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wire id: the field-name hash for named labels, the number otherwise.
    pub fn id(&self) -> u32 {
        match self {
            Self::Named(name) => idl_hash(name),
            Self::Id(id) | Self::Unnamed(id) => *id,
        }
    }

    /// Key under which this field appears in raw input and JSON.
    pub fn key(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Id(id) | Self::Unnamed(id) => id.to_string(),
        }
    }

    /// Whether raw-input key `key` selects this field.
    pub fn matches_key(&self, key: &str) -> bool {
        match self {
            Self::Named(name) => name == key,
            Self::Id(id) | Self::Unnamed(id) => key.parse::<u32>().is_ok_and(|k| k == *id),
        }
    }

    /// Whether two labels name the same wire field.
    pub fn same_field(&self, other: &Label) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) if is_identifier(name) => f.write_str(name),
            Self::Named(name) => write!(f, "{name:?}"),
            Self::Id(id) | Self::Unnamed(id) => write!(f, "{id}"),
        }
    }
}

/// Candid field-name hash.
pub fn idl_hash(name: &str) -> u32 {
    name.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(223).wrapping_add(u32::from(b)))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
