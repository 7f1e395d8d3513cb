//! Candid textual values.
//!
//! Prints values the way they are written in Candid text:
//! `record { name = "Alice"; age = 30 : nat8 }`, `variant { err }`,
//! `opt vec { 1; 2 }`, `blob "\68\69"`. Fixed-width numbers and floats carry
//! a type annotation so the literal re-parses at the same type.

use std::fmt::Write;

use sonde_stack::ensure_sufficient_stack;

use crate::{Idx, Pool, Tag, Value};

/// Format one value of type `ty`.
pub fn value_to_string(pool: &Pool, ty: Idx, value: &Value) -> String {
    let mut out = String::new();
    write_value(pool, Some(ty), value, &mut out);
    out
}

/// Format an argument list: `(v1, v2)`.
///
/// Values beyond the end of `tys` print without annotations.
pub fn args_to_string(pool: &Pool, tys: &[Idx], values: &[Value]) -> String {
    let mut out = String::from("(");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(pool, tys.get(i).copied(), value, &mut out);
    }
    out.push(')');
    out
}

fn write_value(pool: &Pool, ty: Option<Idx>, value: &Value, out: &mut String) {
    ensure_sufficient_stack(|| {
        let ty = ty.map(|ty| pool.resolve(ty));
        let tag = ty.map(|ty| pool.tag(ty));
        match value {
            Value::Null | Value::Reserved => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => {
                let _ = write!(out, "{n}");
                annotate(pool, ty, tag, out);
            }
            Value::Float(f) => {
                let _ = write!(out, "{f:?}");
                annotate(pool, ty, tag, out);
            }
            Value::Text(s) => write_text(s, out),
            Value::Principal(p) => {
                let _ = write!(out, "principal \"{p}\"");
            }
            Value::Service(p) => {
                let _ = write!(out, "service \"{p}\"");
            }
            Value::Func { service, method } => {
                let _ = write!(out, "func \"{service}\".");
                out.push_str(method);
            }
            Value::Blob(bytes) => write_blob(bytes, out),
            Value::Vec(items) => {
                let elem = ty.and_then(|ty| pool.inner(ty));
                if ty.is_some_and(|ty| pool.is_blob(ty)) {
                    if let Some(bytes) = value.as_bytes() {
                        write_blob(&bytes, out);
                        return;
                    }
                }
                write_block(out, "vec", items.iter(), |item, out| {
                    write_value(pool, elem, item, out);
                });
            }
            Value::Opt(None) => out.push_str("null"),
            Value::Opt(Some(inner)) => {
                out.push_str("opt ");
                let inner_ty = ty.and_then(|ty| pool.inner(ty));
                write_value(pool, inner_ty, inner, out);
            }
            Value::Record(fields) => {
                let positional = ty.is_some_and(|ty| pool.is_tuple(ty));
                write_block(out, "record", fields.iter(), |(label, v), out| {
                    if !positional {
                        let _ = write!(out, "{label} = ");
                    }
                    let field_ty = ty
                        .and_then(|ty| pool.field_by_label(ty, label))
                        .map(|(_, field_ty)| field_ty);
                    write_value(pool, field_ty, v, out);
                });
            }
            Value::Variant(label, inner) => {
                let _ = write!(out, "variant {{ {label}");
                if !matches!(**inner, Value::Null) {
                    out.push_str(" = ");
                    let field_ty = ty
                        .filter(|_| tag == Some(Tag::Variant))
                        .and_then(|ty| pool.field_by_label(ty, label))
                        .map(|(_, field_ty)| field_ty);
                    write_value(pool, field_ty, inner, out);
                }
                out.push_str(" }");
            }
        }
    });
}

/// ` : nat8` for fixed-width numbers and floats; unbounded `nat`/`int`
/// are the default reading of an integer literal.
fn annotate(pool: &Pool, ty: Option<Idx>, tag: Option<Tag>, out: &mut String) {
    let (Some(ty), Some(tag)) = (ty, tag) else {
        return;
    };
    if tag.is_fixed_nat() || tag.is_fixed_int() || tag.is_float() {
        out.push_str(" : ");
        pool.format_type_into(ty, out);
    }
}

fn write_block<I: ExactSizeIterator>(
    out: &mut String,
    keyword: &str,
    items: I,
    mut item: impl FnMut(I::Item, &mut String),
) {
    out.push_str(keyword);
    if items.len() == 0 {
        out.push_str(" {}");
        return;
    }
    out.push_str(" { ");
    for (i, it) in items.enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        item(it, out);
    }
    out.push_str(" }");
}

fn write_text(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_blob(bytes: &[u8], out: &mut String) {
    out.push_str("blob \"");
    for b in bytes {
        let _ = write!(out, "\\{b:02x}");
    }
    out.push('"');
}
