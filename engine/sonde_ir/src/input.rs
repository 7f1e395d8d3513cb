//! Coercions for untyped form input.
//!
//! Form controls hand the engine loosely typed JSON: text boxes produce
//! strings, checkboxes produce booleans, nested controls produce objects and
//! arrays. These helpers give those inputs the same meaning a browser
//! front-end would: JS truthiness, `String(x)` for text, and `BigInt(x)` for
//! integers (blank text is zero, fractional numbers are rejected). Integers
//! always come back as `BigInt`; nothing here narrows to a native width.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Num, Zero};
use serde_json::Value as Json;
use thiserror::Error;

/// Failure to read a number out of raw input.
///
/// Messages match the wording users see from a browser's `BigInt()` and
/// `Number()` so the form reports what actually failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NumberError {
    #[error("Cannot convert {0} to a BigInt")]
    NotInteger(String),
    #[error("The number {0} cannot be converted to a BigInt because it is not an integer")]
    Fractional(String),
    #[error("Cannot convert {0} to a number")]
    NotNumber(String),
}

/// JS truthiness of a raw input.
pub fn is_truthy(input: &Json) -> bool {
    match input {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Json::String(s) => !s.is_empty(),
        Json::Array(_) | Json::Object(_) => true,
    }
}

/// Text of a raw input; falsy inputs become the empty string.
pub fn text_of(input: &Json) -> String {
    if !is_truthy(input) {
        return String::new();
    }
    match input {
        Json::String(s) => s.clone(),
        Json::Number(n) => n.to_string(),
        Json::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Read an arbitrary-precision integer from raw input.
///
/// Accepts decimal text with an optional sign, `0x`/`0o`/`0b` prefixed text,
/// integral JSON numbers (including float-typed ones such as `30.0`) and
/// booleans. Blank text reads as zero.
pub fn parse_big_int(input: &Json) -> Result<BigInt, NumberError> {
    match input {
        Json::Null => Err(NumberError::NotInteger("null".to_owned())),
        Json::Bool(b) => Ok(BigInt::from(u8::from(*b))),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(BigInt::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(BigInt::from(u))
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .and_then(BigInt::from_f64)
                    .ok_or_else(|| NumberError::Fractional(n.to_string()))
            }
        }
        Json::String(s) => parse_big_int_text(s),
        Json::Array(items) if items.is_empty() => Ok(BigInt::zero()),
        Json::Array(_) | Json::Object(_) => Err(NumberError::NotInteger(input.to_string())),
    }
}

/// Read an arbitrary-precision integer from text.
pub fn parse_big_int_text(text: &str) -> Result<BigInt, NumberError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(BigInt::zero());
    }
    let not_integer = || NumberError::NotInteger(text.to_owned());

    let prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(prefix).map(|rest| (rest, radix)));
    if let Some((digits, radix)) = prefixed {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(not_integer());
        }
        return BigInt::from_str_radix(digits, radix).map_err(|_| not_integer());
    }

    let (negative, digits) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_integer());
    }
    let magnitude = BigInt::from_str_radix(digits, 10).map_err(|_| not_integer())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Read a float from raw input with `Number()` semantics, rejecting `NaN`
/// results that come from non-numeric text.
pub fn parse_float(input: &Json) -> Result<f64, NumberError> {
    match input {
        Json::Null => Ok(0.0),
        Json::Bool(b) => Ok(f64::from(u8::from(*b))),
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| NumberError::NotNumber(n.to_string())),
        Json::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            match trimmed {
                "Infinity" | "+Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                _ => trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| NumberError::NotNumber(s.clone())),
            }
        }
        Json::Array(_) | Json::Object(_) => Err(NumberError::NotNumber(input.to_string())),
    }
}
