//! Protobuf text format.
//!
//! ```text
//! to {
//!   identifier: "hi"
//! }
//! amount_e8s: 100000000
//! kind: BURN
//! tags: 1
//! tags: 2
//! ```
//!
//! Unset fields and empty repeated fields print nothing. Bytes print as
//! escaped strings with non-printable bytes in octal.

use std::fmt::Write;

use sonde_stack::ensure_sufficient_stack;

use crate::Value;

/// Print one value. Messages print their fields; anything else prints as
/// the literal that would follow `field:`.
pub fn to_text_format(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Message(fields) => write_fields(fields, 0, &mut out),
        other => write_scalar(other, &mut out),
    }
    while out.ends_with('\n') {
        out.pop();
    }
    out
}

fn write_fields(fields: &[(String, Value)], depth: usize, out: &mut String) {
    ensure_sufficient_stack(|| {
        for (name, value) in fields {
            match value {
                Value::List(items) => {
                    for item in items {
                        write_field(name, item, depth, out);
                    }
                }
                value => write_field(name, value, depth, out),
            }
        }
    });
}

fn write_field(name: &str, value: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Unset => {}
        Value::Message(fields) => {
            let _ = writeln!(out, "{indent}{name} {{");
            write_fields(fields, depth + 1, out);
            let _ = writeln!(out, "{indent}}}");
        }
        value => {
            let _ = write!(out, "{indent}{name}: ");
            write_scalar(value, out);
            out.push('\n');
        }
    }
}

fn write_scalar(value: &Value, out: &mut String) {
    match value {
        Value::Unset => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float(f) => {
            let _ = write!(out, "{f}");
        }
        Value::String(s) => write_quoted(s.as_bytes(), out),
        Value::Bytes(bytes) => write_quoted(bytes, out),
        Value::Enum { name, .. } => out.push_str(name),
        Value::Message(fields) => {
            out.push_str("{ ");
            let mut inner = String::new();
            write_fields(fields, 0, &mut inner);
            out.push_str(&inner.lines().collect::<Vec<_>>().join(" "));
            out.push_str(" }");
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_scalar(item, out);
            }
            out.push(']');
        }
    }
}

/// C-style escaping as protobuf text format writes it. Valid UTF-8 text
/// stays readable; other bytes become octal escapes.
fn write_quoted(bytes: &[u8], out: &mut String) {
    out.push('"');
    let text = String::from_utf8_lossy(bytes);
    let lossless = matches!(text, std::borrow::Cow::Borrowed(_));
    if lossless {
        for c in text.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    let mut buf = [0u8; 4];
                    for b in c.encode_utf8(&mut buf).bytes() {
                        let _ = write!(out, "\\{b:03o}");
                    }
                }
                c => out.push(c),
            }
        }
    } else {
        for &b in bytes {
            match b {
                b'"' => out.push_str("\\\""),
                b'\\' => out.push_str("\\\\"),
                0x20..=0x7e => out.push(char::from(b)),
                _ => {
                    let _ = write!(out, "\\{b:03o}");
                }
            }
        }
    }
    out.push('"');
}
