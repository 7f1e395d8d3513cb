//! Principals and their textual form.
//!
//! The text form of a principal is the lowercase, unpadded RFC 4648 base32
//! encoding of `crc32(bytes) ‖ bytes`, split into groups of five characters
//! joined by `-`. Parsing is strict: the input must be exactly what
//! [`Principal::to_text`] would produce for the decoded bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use thiserror::Error;

const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";
const CHECKSUM_LEN: usize = 4;
const GROUP_LEN: usize = 5;

/// Failure to parse a principal from text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PrincipalError {
    #[error("principal text is empty")]
    Empty,
    #[error("invalid character {ch:?} in principal \"{text}\"")]
    InvalidCharacter { text: String, ch: char },
    #[error("principal \"{0}\" is too short to carry a checksum")]
    TooShort(String),
    #[error("principal \"{text}\" is {len} bytes long, at most {max} are allowed", max = Principal::MAX_LENGTH)]
    TooLong { text: String, len: usize },
    #[error("principal \"{text}\" does not have a valid checksum (original value \"{expected}\" may not be a valid principal)")]
    Checksum { text: String, expected: String },
    #[error("principal \"{text}\" is not in canonical form, expected \"{expected}\"")]
    NotCanonical { text: String, expected: String },
}

/// An opaque principal identifier of at most 29 bytes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal(SmallVec<[u8; 29]>);

impl Principal {
    /// Longest principal the protocol allows.
    pub const MAX_LENGTH: usize = 29;

    /// The management canister: the empty principal, `aaaaa-aa`.
    pub fn management_canister() -> Self {
        Self(SmallVec::new())
    }

    /// The anonymous principal, `2vxsx-fae`.
    pub fn anonymous() -> Self {
        Self(SmallVec::from_slice(&[0x04]))
    }

    /// Wrap raw principal bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        (bytes.len() <= Self::MAX_LENGTH).then(|| Self(SmallVec::from_slice(bytes)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Parse the canonical text form.
    pub fn from_text(text: &str) -> Result<Self, PrincipalError> {
        if text.is_empty() {
            return Err(PrincipalError::Empty);
        }
        let compact: String = text.chars().filter(|&c| c != '-').collect();
        let decoded = base32_decode(&compact).map_err(|ch| PrincipalError::InvalidCharacter {
            text: text.to_owned(),
            ch,
        })?;
        if decoded.len() < CHECKSUM_LEN {
            return Err(PrincipalError::TooShort(text.to_owned()));
        }
        let (checksum, body) = decoded.split_at(CHECKSUM_LEN);
        if body.len() > Self::MAX_LENGTH {
            return Err(PrincipalError::TooLong {
                text: text.to_owned(),
                len: body.len(),
            });
        }

        let principal = Self(SmallVec::from_slice(body));
        let expected = principal.to_text();
        if checksum != crc32fast::hash(body).to_be_bytes() {
            return Err(PrincipalError::Checksum {
                text: text.to_owned(),
                expected,
            });
        }
        if expected != text {
            return Err(PrincipalError::NotCanonical {
                text: text.to_owned(),
                expected,
            });
        }
        Ok(principal)
    }

    /// Canonical text form.
    pub fn to_text(&self) -> String {
        let mut payload = Vec::with_capacity(CHECKSUM_LEN + self.0.len());
        payload.extend_from_slice(&crc32fast::hash(&self.0).to_be_bytes());
        payload.extend_from_slice(&self.0);

        let encoded = base32_encode(&payload);
        let mut out = String::with_capacity(encoded.len() + encoded.len() / GROUP_LEN);
        for (i, ch) in encoded.chars().enumerate() {
            if i > 0 && i % GROUP_LEN == 0 {
                out.push('-');
            }
            out.push(ch);
        }
        out
    }
}

impl FromStr for Principal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.to_text())
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

fn base32_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for &byte in bytes {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(char::from(ALPHABET[((buffer >> bits) & 0x1f) as usize]));
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(char::from(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize]));
    }
    out
}

/// Decode unpadded lowercase base32. Returns the first offending character.
fn base32_decode(text: &str) -> Result<Vec<u8>, char> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for ch in text.chars() {
        let value = match ch {
            'a'..='z' => ch as u32 - 'a' as u32,
            '2'..='7' => ch as u32 - '2' as u32 + 26,
            _ => return Err(ch),
        };
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            #[allow(clippy::cast_possible_truncation, reason = "masked to one byte")]
            out.push(((buffer >> bits) & 0xff) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    Ok(out)
}
