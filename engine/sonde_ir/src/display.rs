//! Display modes and the rendered value tree.
//!
//! Renderers do not produce markup. They produce a [`Rendered`] tree that a
//! front-end maps onto widgets; [`Rendered::to_text`] prints the same tree as
//! indented plain text for terminals and tests.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Principal;

/// How a reply value is shown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Per-type structured rendering.
    #[default]
    Pretty,
    /// Type-agnostic JSON with big integers as strings.
    Json,
    /// The IDL's own textual literal syntax.
    Canonical,
    /// Wire bytes as `0x`-prefixed hex.
    Raw,
}

impl DisplayMode {
    pub const ALL: [Self; 4] = [Self::Pretty, Self::Json, Self::Canonical, Self::Raw];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Canonical => "canonical",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown display mode or byte encoding name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} \"{name}\"")]
pub struct UnknownName {
    kind: &'static str,
    name: String,
}

impl FromStr for DisplayMode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownName {
                kind: "display mode",
                name: s.to_owned(),
            })
    }
}

/// Sub-encoding for byte vectors in pretty mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BytesEncoding {
    #[default]
    Hex,
    Utf8,
    Base64,
    /// JSON array of byte values.
    Array,
}

/// Text that does not decode under the chosen byte encoding.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BytesError {
    #[error("invalid hex: {0}")]
    Hex(String),
    #[error("invalid base64: {0}")]
    Base64(String),
    #[error("invalid byte array: {0}")]
    Array(String),
}

impl BytesEncoding {
    pub const ALL: [Self; 4] = [Self::Hex, Self::Utf8, Self::Base64, Self::Array];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Utf8 => "utf8",
            Self::Base64 => "base64",
            Self::Array => "array",
        }
    }

    /// Show `bytes` in this encoding. UTF-8 replaces invalid sequences.
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Base64 => STANDARD.encode(bytes),
            Self::Array => serde_json::Value::from(bytes.to_vec()).to_string(),
        }
    }

    /// Read bytes typed by a user in this encoding.
    pub fn decode(self, text: &str) -> Result<Vec<u8>, BytesError> {
        match self {
            Self::Hex => {
                let trimmed = text.trim();
                let digits = trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                    .unwrap_or(trimmed);
                hex::decode(digits).map_err(|e| BytesError::Hex(e.to_string()))
            }
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Base64 => STANDARD
                .decode(text.trim())
                .map_err(|e| BytesError::Base64(e.to_string())),
            Self::Array => {
                serde_json::from_str(text).map_err(|e| BytesError::Array(e.to_string()))
            }
        }
    }
}

impl fmt::Display for BytesEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BytesEncoding {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|enc| {
                enc.as_str().eq_ignore_ascii_case(wanted)
                    || (*enc == Self::Utf8 && wanted.eq_ignore_ascii_case("utf-8"))
            })
            .ok_or_else(|| UnknownName {
                kind: "byte encoding",
                name: s.to_owned(),
            })
    }
}

/// Everything a renderer needs besides the type and the value.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub display: DisplayMode,
    pub bytes: BytesEncoding,
    /// Apply the timestamp heuristic to time-like numeric fields.
    pub timestamps: bool,
    /// The principal the current page is about. Rendered as plain text
    /// rather than a link to itself.
    pub subject: Option<Principal>,
    /// Reference instant for relative times.
    pub now: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            display: DisplayMode::Pretty,
            bytes: BytesEncoding::Hex,
            timestamps: true,
            subject: None,
            now,
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayMode) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn with_bytes(mut self, bytes: BytesEncoding) -> Self {
        self.bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Principal) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// One rendered node: an optional label, an optional element/character
/// count, and the body.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub label: Option<String>,
    pub count: Option<usize>,
    pub body: Body,
}

/// What a rendered node shows.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Zero-width (the `null` type).
    Nothing,
    /// The "empty" placeholder for empty text, vectors and absent options.
    Empty,
    /// Decimal number, with a relative time when the timestamp heuristic hit.
    Number {
        text: String,
        relative: Option<String>,
    },
    /// Plain text.
    Text(String),
    /// An absolute http(s) URL.
    Link(String),
    /// A principal; `link` is false for the page's own subject.
    Principal { text: String, link: bool },
    /// A byte vector in the chosen sub-encoding.
    Bytes { encoding: BytesEncoding, text: String },
    /// JSON text (JSON mode, numeric vectors, and the fallback for anything
    /// without a dedicated rendering).
    Json(String),
    /// Wire bytes as `0x`-prefixed hex with their length.
    Raw { hex: String, len: usize },
    /// IDL literal text.
    Canonical(String),
    /// A selected variant field and, unless it is a unit field, its value.
    Heading {
        name: String,
        inner: Option<Box<Rendered>>,
    },
    /// Nested children (records, tuples, vectors, argument lists).
    Nested(Vec<Rendered>),
    /// An error shown verbatim.
    Error(String),
}

impl Rendered {
    pub fn new(body: Body) -> Self {
        Self {
            label: None,
            count: None,
            body,
        }
    }

    #[must_use]
    pub fn labeled(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn counted(mut self, count: Option<usize>) -> Self {
        self.count = count;
        self
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::new(Body::Error(msg.into()))
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(Body::Json(value.to_string()))
    }

    /// A text leaf: the empty placeholder, a link for http(s) URLs, plain
    /// text otherwise. Non-empty text carries its character count.
    pub fn text(text: &str) -> Self {
        if text.is_empty() {
            return Self::new(Body::Empty);
        }
        let count = Some(text.chars().count());
        let body = match http_link(text) {
            Some(url) => Body::Link(url),
            None => Body::Text(text.to_owned()),
        };
        Self::new(body).counted(count)
    }

    /// Raw wire bytes, `0x`-prefixed.
    pub fn raw(bytes: &[u8]) -> Self {
        Self::new(Body::Raw {
            hex: format!("0x{}", hex::encode(bytes)),
            len: bytes.len(),
        })
    }

    /// Print as indented plain text, two spaces per level.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(0, &mut out);
        while out.ends_with('\n') {
            out.pop();
        }
        out
    }

    fn write_text(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let mut head = self.label.clone().unwrap_or_default();
        if let Some(count) = self.count {
            if !head.is_empty() {
                head.push(' ');
            }
            head.push_str(&format!("({count})"));
        }

        match &self.body {
            // An unlabeled list at the top needs no header line of its own.
            Body::Nested(children) if depth == 0 && head.is_empty() => {
                for child in children {
                    child.write_text(0, out);
                }
            }
            Body::Nested(children) => {
                out.push_str(&indent);
                out.push_str(if head.is_empty() { "-" } else { &head });
                out.push('\n');
                for child in children {
                    child.write_text(depth + 1, out);
                }
            }
            Body::Heading { name, inner } => {
                out.push_str(&indent);
                if !head.is_empty() {
                    out.push_str(&head);
                    out.push_str(": ");
                }
                out.push_str(name);
                out.push('\n');
                if let Some(inner) = inner {
                    inner.write_text(depth + 1, out);
                }
            }
            body => {
                out.push_str(&indent);
                if !head.is_empty() {
                    out.push_str(&head);
                    out.push_str(": ");
                }
                write_leaf(body, out);
                out.push('\n');
            }
        }
    }
}

fn write_leaf(body: &Body, out: &mut String) {
    match body {
        Body::Nothing | Body::Nested(_) | Body::Heading { .. } => {}
        Body::Empty => out.push_str("empty"),
        Body::Number { text, relative } => {
            out.push_str(text);
            if let Some(relative) = relative {
                out.push_str(" (");
                out.push_str(relative);
                out.push(')');
            }
        }
        Body::Text(text)
        | Body::Link(text)
        | Body::Principal { text, .. }
        | Body::Bytes { text, .. }
        | Body::Json(text)
        | Body::Canonical(text) => out.push_str(text),
        Body::Raw { hex, len } => {
            out.push_str(hex);
            out.push_str(&format!(" ({len} bytes)"));
        }
        Body::Error(msg) => {
            out.push_str("error: ");
            out.push_str(msg);
        }
    }
}

/// The text as a link target if it is an absolute http(s) URL.
pub fn http_link(text: &str) -> Option<String> {
    let url = url::Url::parse(text).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| text.to_owned())
}

#[cfg(test)]
mod tests;
