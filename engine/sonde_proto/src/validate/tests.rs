use pretty_assertions::assert_eq;
use serde_json::json;
use sonde_ir::ErrorTree;

use super::validate;
use crate::{FieldDef, MessageId, Scalar, Schema, Ty, Value};

fn transfer_schema() -> (Schema, MessageId) {
    let mut schema = Schema::new();
    let kind = schema
        .add_enum("Kind", &[("KIND_UNSPECIFIED", 0), ("MINT", 1), ("BURN", 2)])
        .expect("enum");
    let account = schema
        .add_message("Account", vec![FieldDef::new("identifier", 1, Ty::scalar(Scalar::Bytes))])
        .expect("message");
    let transfer = schema
        .add_message(
            "Transfer",
            vec![
                FieldDef::new("to", 1, Ty::message(account)),
                FieldDef::new("amount_e8s", 2, Ty::scalar(Scalar::Uint64)),
                FieldDef::new("memo", 3, Ty::scalar(Scalar::String).optional()),
                FieldDef::new("kind", 4, Ty::enumeration(kind)),
                FieldDef::new("tags", 5, Ty::scalar(Scalar::Int32).repeated()),
            ],
        )
        .expect("message");
    (schema, transfer)
}

#[test]
fn default_message_validates() {
    let (schema, transfer) = transfer_schema();
    let input = schema.default_input(Ty::message(transfer));
    assert_eq!(
        validate(&schema, Ty::message(transfer), &input),
        Ok(Value::Message(vec![
            ("to".to_owned(), Value::Unset),
            ("amount_e8s".to_owned(), Value::int(0)),
            ("memo".to_owned(), Value::Unset),
            ("kind".to_owned(), Value::enumeration("KIND_UNSPECIFIED", 0)),
            ("tags".to_owned(), Value::List(Vec::new())),
        ]))
    );
}

#[test]
fn nested_messages_and_json_names() {
    let (schema, transfer) = transfer_schema();
    let input = json!({
        "to": { "identifier": "aGk=" },
        "amountE8s": "100000000",
        "memo": "rent",
        "kind": 2,
        "tags": [1, "2"],
    });
    let value = validate(&schema, Ty::message(transfer), &input).expect("valid transfer");
    assert_eq!(
        value.field("to"),
        Some(&Value::Message(vec![("identifier".to_owned(), Value::Bytes(b"hi".to_vec()))]))
    );
    assert_eq!(value.field("amount_e8s"), Some(&Value::int(100_000_000)));
    assert_eq!(value.field("memo"), Some(&Value::string("rent")));
    assert_eq!(value.field("kind"), Some(&Value::enumeration("BURN", 2)));
    assert_eq!(
        value.field("tags"),
        Some(&Value::List(vec![Value::int(1), Value::int(2)]))
    );
}

#[test]
fn failing_fields_are_keyed_and_the_rest_kept() {
    let (schema, transfer) = transfer_schema();
    let input = json!({ "amount_e8s": "lots", "kind": "REFUND", "memo": "x" });
    let rejected = validate(&schema, Ty::message(transfer), &input).expect_err("two bad fields");
    assert_eq!(
        rejected.error,
        ErrorTree::Fields(vec![
            (
                "amount_e8s".to_owned(),
                ErrorTree::message("Cannot convert lots to a BigInt")
            ),
            (
                "kind".to_owned(),
                ErrorTree::message(r#"unknown value "REFUND" for enum Kind"#)
            ),
        ])
    );
    let partial = rejected.partial.expect("messages keep the remainder");
    assert_eq!(partial.field("memo"), Some(&Value::string("x")));
    assert_eq!(partial.field("amount_e8s"), None);
}

#[test]
fn repeated_fields_are_lenient() {
    let schema = Schema::new();
    let ty = Ty::scalar(Scalar::Sint64).repeated();
    assert_eq!(validate(&schema, ty, &json!("1,2")), Ok(Value::List(Vec::new())));

    let rejected = validate(&schema, ty, &json!(["1", "x"])).expect_err("second is bad");
    assert_eq!(
        rejected.error,
        ErrorTree::Elements(vec![None, Some(ErrorTree::message("Cannot convert x to a BigInt"))])
    );
}

#[test]
fn bytes_from_arrays_or_base64() {
    let schema = Schema::new();
    let ty = Ty::scalar(Scalar::Bytes);
    assert_eq!(validate(&schema, ty, &json!([104, 105])), Ok(Value::Bytes(b"hi".to_vec())));
    assert_eq!(validate(&schema, ty, &json!("aGk=")), Ok(Value::Bytes(b"hi".to_vec())));

    let rejected = validate(&schema, ty, &json!([1, 256])).expect_err("not a byte");
    assert_eq!(
        rejected.error,
        ErrorTree::Elements(vec![None, Some(ErrorTree::message("256 is not a byte"))])
    );
    assert!(validate(&schema, ty, &json!(true)).is_err());
}

#[test]
fn integer_bounds_are_advisory() {
    let schema = Schema::new();
    let ty = Ty::scalar(Scalar::Uint32);
    assert_eq!(validate(&schema, ty, &json!("-5")), Ok(Value::int(-5)));
    assert!(schema
        .bounds_hint(ty, &num_bigint::BigInt::from(-5))
        .is_some());
}

#[test]
fn root_message_rejects_other_shapes() {
    let (schema, transfer) = transfer_schema();
    let rejected = validate(&schema, Ty::message(transfer), &json!([1])).expect_err("array");
    assert_eq!(rejected.error, ErrorTree::message("invalid message"));
}
