use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use sonde_ir::{Body, BytesEncoding, DisplayMode, Principal, RenderContext, Rendered};

use super::{render, render_args};
use crate::codec::fake::JsonCodec;
use crate::{Idx, Label, Pool, Value};

fn cx() -> RenderContext {
    let now = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid date");
    RenderContext::new(now)
}

fn pretty(pool: &Pool, ty: Idx, value: &Value) -> Rendered {
    render(pool, &JsonCodec, ty, value, &cx())
}

fn hello() -> Value {
    Value::Vec(b"hello".iter().map(|&b| Value::number(b)).collect())
}

#[test]
fn unit_variant_shows_only_its_heading() {
    let mut pool = Pool::new();
    let ty = pool.variant_named(&[("ok", Idx::TEXT), ("err", Idx::NULL)]);
    let value = Value::variant(Label::named("err"), Value::Null);

    let node = pretty(&pool, ty, &value);
    assert_eq!(
        node.body,
        Body::Heading {
            name: "err".to_owned(),
            inner: None
        }
    );
    assert_eq!(node.to_text(), "err");
}

#[test]
fn variant_with_payload_nests_it() {
    let mut pool = Pool::new();
    let ty = pool.variant_named(&[("ok", Idx::TEXT), ("err", Idx::NULL)]);
    let value = Value::variant(Label::named("ok"), Value::text("done"));
    assert_eq!(pretty(&pool, ty, &value).to_text(), "ok\n  (4): done");
}

#[test]
fn byte_vectors_follow_the_sub_encoding() {
    let mut pool = Pool::new();
    let ty = pool.blob();

    let utf8 = render(&pool, &JsonCodec, ty, &hello(), &cx().with_bytes(BytesEncoding::Utf8));
    assert_eq!(
        utf8.body,
        Body::Bytes {
            encoding: BytesEncoding::Utf8,
            text: "hello".to_owned()
        }
    );
    assert_eq!(utf8.count, Some(5));

    let hex = render(&pool, &JsonCodec, ty, &Value::Blob(b"hello".to_vec()), &cx());
    assert_eq!(
        hex.body,
        Body::Bytes {
            encoding: BytesEncoding::Hex,
            text: "68656c6c6f".to_owned()
        }
    );

    let empty = pretty(&pool, ty, &Value::Blob(Vec::new()));
    assert_eq!(empty.body, Body::Empty);
    assert_eq!(empty.count, None);
}

#[test]
fn numeric_vectors_render_inline() {
    let mut pool = Pool::new();
    let ty = pool.vec(Idx::NAT64);
    let value = Value::Vec(vec![Value::number(1), Value::number(2)]);

    let node = pretty(&pool, ty, &value);
    assert_eq!(node.body, Body::Json(r#"["1","2"]"#.to_owned()));
    assert_eq!(node.count, Some(2));

    let none = pretty(&pool, ty, &Value::Vec(Vec::new()));
    assert_eq!(none.count, None);
}

#[test]
fn record_fields_are_labeled_and_nested() {
    let mut pool = Pool::new();
    let names = pool.vec(Idx::TEXT);
    let ty = pool.record_named(&[("name", Idx::TEXT), ("nick", names), ("unit", Idx::NULL)]);
    let value = Value::Record(vec![
        (Label::named("name"), Value::text("Alice")),
        (
            Label::named("nick"),
            Value::Vec(vec![Value::text("al"), Value::text("")]),
        ),
        (Label::named("unit"), Value::Null),
    ]);

    assert_eq!(
        pretty(&pool, ty, &value).to_text(),
        "name (5): Alice\nnick (2)\n  (2): al\n  empty"
    );
}

#[test]
fn tuples_are_unlabeled() {
    let mut pool = Pool::new();
    let ty = pool.tuple(&[Idx::BOOL, Idx::INT]);
    let value = Value::Record(vec![
        (Label::Unnamed(0), Value::Bool(true)),
        (Label::Unnamed(1), Value::number(-5)),
    ]);
    assert_eq!(pretty(&pool, ty, &value).to_text(), "true\n-5");
}

#[test]
fn options_keep_the_outer_label() {
    let mut pool = Pool::new();
    let maybe = pool.opt(Idx::NAT);
    let ty = pool.record_named(&[("limit", maybe), ("offset", maybe)]);
    let value = Value::Record(vec![
        (Label::named("limit"), Value::some(Value::number(10))),
        (Label::named("offset"), Value::none()),
    ]);
    assert_eq!(pretty(&pool, ty, &value).to_text(), "limit: 10\noffset: empty");
}

#[test]
fn time_like_fields_get_a_relative_time() {
    let mut pool = Pool::new();
    let ty = pool.record_named(&[("created_at_time", Idx::NAT64), ("amount", Idx::NAT64)]);
    let day_before = 1_703_980_800u64;
    let value = Value::Record(vec![
        (Label::named("created_at_time"), Value::number(day_before)),
        (Label::named("amount"), Value::number(day_before)),
    ]);

    assert_eq!(
        pretty(&pool, ty, &value).to_text(),
        "created_at_time: 1703980800 (1 day ago)\namount: 1703980800"
    );

    let off = render(&pool, &JsonCodec, ty, &value, &cx().with_timestamps(false));
    assert_eq!(off.to_text(), "created_at_time: 1703980800\namount: 1703980800");
}

#[test]
fn variant_payload_uses_the_field_name_for_timestamps() {
    let mut pool = Pool::new();
    let ty = pool.variant_named(&[("created_at_time", Idx::NAT64), ("never", Idx::NULL)]);
    let value = Value::variant(Label::named("created_at_time"), Value::number(1_703_980_800u64));

    assert_eq!(
        pretty(&pool, ty, &value).to_text(),
        "created_at_time\n  1703980800 (1 day ago)"
    );
}

#[test]
fn text_links_and_principals() {
    let pool = Pool::new();
    let link = pretty(&pool, Idx::TEXT, &Value::text("https://internetcomputer.org"));
    assert_eq!(link.body, Body::Link("https://internetcomputer.org".to_owned()));

    let anon = Value::Principal(Principal::anonymous());
    let other = pretty(&pool, Idx::PRINCIPAL, &anon);
    assert_eq!(
        other.body,
        Body::Principal {
            text: "2vxsx-fae".to_owned(),
            link: true
        }
    );

    let own_page = cx().with_subject(Principal::anonymous());
    let this = render(&pool, &JsonCodec, Idx::PRINCIPAL, &anon, &own_page);
    assert_eq!(
        this.body,
        Body::Principal {
            text: "2vxsx-fae".to_owned(),
            link: false
        }
    );
}

#[test]
fn mismatched_values_fall_back_to_json() {
    let pool = Pool::new();
    let node = pretty(&pool, Idx::TEXT, &Value::number(3));
    assert_eq!(node.body, Body::Json(r#""3""#.to_owned()));
    let node = pretty(&pool, Idx::BOOL, &Value::Bool(true));
    assert_eq!(node.body, Body::Json("true".to_owned()));
}

#[test]
fn json_mode_ignores_the_type() {
    let mut pool = Pool::new();
    let ty = pool.record_named(&[("owner", Idx::PRINCIPAL), ("balance", Idx::NAT)]);
    let value = Value::Record(vec![
        (Label::named("owner"), Value::Principal(Principal::anonymous())),
        (
            Label::named("balance"),
            Value::Number("123456789012345678901234567890".parse().expect("digits")),
        ),
    ]);
    let node = render(&pool, &JsonCodec, ty, &value, &cx().with_display(DisplayMode::Json));
    assert_eq!(
        node.body,
        Body::Json(r#"{"owner":"2vxsx-fae","balance":"123456789012345678901234567890"}"#.to_owned())
    );
}

#[test]
fn raw_mode_uses_the_codec_and_falls_back() {
    let pool = Pool::new();
    let raw = cx().with_display(DisplayMode::Raw);

    let node = render(&pool, &JsonCodec, Idx::BOOL, &Value::Bool(true), &raw);
    assert_eq!(node.to_text(), "0x74727565 (4 bytes)");

    let node = render(&pool, &JsonCodec, Idx::EMPTY, &Value::Null, &raw);
    assert_eq!(node.body, Body::Json("null".to_owned()));
}

#[test]
fn argument_lists_in_each_mode() {
    let mut pool = Pool::new();
    let person = pool.record_named(&[("name", Idx::TEXT), ("age", Idx::NAT8)]);
    let tys = [person, Idx::BOOL];
    let values = [
        Value::Record(vec![
            (Label::named("name"), Value::text("Alice")),
            (Label::named("age"), Value::number(30)),
        ]),
        Value::Bool(false),
    ];

    let canonical = render_args(
        &pool,
        &JsonCodec,
        &tys,
        &values,
        &cx().with_display(DisplayMode::Canonical),
    );
    assert_eq!(
        canonical.to_text(),
        r#"(record { name = "Alice"; age = 30 : nat8 }, false)"#
    );

    let json = render_args(&pool, &JsonCodec, &tys, &values, &cx().with_display(DisplayMode::Json));
    assert_eq!(json.to_text(), r#"[{"name":"Alice","age":"30"},false]"#);

    let pretty = render_args(&pool, &JsonCodec, &tys, &values, &cx());
    assert_eq!(pretty.to_text(), "name (5): Alice\nage: 30\nfalse");
}
