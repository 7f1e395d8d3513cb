//! Field paths into input and error trees.

use std::fmt;

use smallvec::SmallVec;

/// One step of a path: a record/variant field name or an array position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSeg {
    /// Field of a record, message or variant, addressed by its key text.
    Field(String),
    /// Position in a sequence (vector element, tuple component, argument).
    Index(usize),
}

/// A path from the root of an argument list down to a single node.
///
/// Form paths are short; eight segments cover almost every real signature
/// without spilling to the heap.
pub type Path = SmallVec<[PathSeg; 8]>;

impl PathSeg {
    /// Build a field segment.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }
}

impl From<&str> for PathSeg {
    fn from(name: &str) -> Self {
        Self::Field(name.to_owned())
    }
}

impl From<usize> for PathSeg {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Render a path as `0.owner[2].name`-style text for log lines and messages.
pub fn display_path(path: &[PathSeg]) -> String {
    let mut out = String::new();
    for (i, seg) in path.iter().enumerate() {
        match seg {
            PathSeg::Field(name) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSeg::Index(index) if i == 0 => out.push_str(&index.to_string()),
            PathSeg::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}
