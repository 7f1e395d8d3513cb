use super::*;
use pretty_assertions::assert_eq;

#[test]
fn self_referential_messages() {
    let mut schema = Schema::new();
    let node = schema.declare_message("Node");
    schema
        .define_message(
            node,
            vec![
                FieldDef::new("value", 1, Ty::scalar(Scalar::Int64)),
                FieldDef::new("children", 2, Ty::message(node).repeated()),
                FieldDef::new("parent", 3, Ty::message(node)),
            ],
        )
        .expect("valid message");

    assert_eq!(schema.lookup("Node"), Some(Kind::Message(node)));
    assert_eq!(
        schema.field(node, "children").map(|f| f.ty),
        Some(Ty::message(node).repeated())
    );
    assert_eq!(schema.format_ty(Ty::message(node).repeated()), "repeated Node");
}

#[test]
fn duplicate_fields_are_rejected() {
    let mut schema = Schema::new();
    let by_name = schema.add_message(
        "A",
        vec![
            FieldDef::new("x", 1, Ty::scalar(Scalar::Bool)),
            FieldDef::new("x", 2, Ty::scalar(Scalar::Bool)),
        ],
    );
    assert_eq!(
        by_name,
        Err(SchemaError::DuplicateFieldName {
            message: "A".to_owned(),
            field: "x".to_owned()
        })
    );

    let by_number = schema.add_message(
        "B",
        vec![
            FieldDef::new("x", 1, Ty::scalar(Scalar::Bool)),
            FieldDef::new("y", 1, Ty::scalar(Scalar::Bool)),
        ],
    );
    assert!(matches!(
        by_number,
        Err(SchemaError::DuplicateFieldNumber { number: 1, .. })
    ));
}

#[test]
fn messages_are_defined_once() {
    let mut schema = Schema::new();
    let id = schema.add_message("A", Vec::new()).expect("first");
    assert_eq!(
        schema.define_message(id, Vec::new()),
        Err(SchemaError::Redefined("A".to_owned()))
    );
}

#[test]
fn enums_need_values() {
    let mut schema = Schema::new();
    assert_eq!(
        schema.add_enum("Empty", &[]),
        Err(SchemaError::EmptyEnum("Empty".to_owned()))
    );
    let status = schema
        .add_enum("Status", &[("UNKNOWN", 0), ("OPEN", 1), ("CLOSED", 2)])
        .expect("valid enum");
    let def = schema.enumeration(status);
    assert_eq!(def.by_name("OPEN"), Some(&("OPEN".to_owned(), 1)));
    assert_eq!(def.by_number(2).map(|(n, _)| n.as_str()), Some("CLOSED"));
    assert_eq!(def.by_number(9), None);
    assert_eq!(schema.format_ty(Ty::enumeration(status).optional()), "optional Status");
}

#[test]
fn scalar_bounds() {
    assert_eq!(
        Scalar::Uint32.bounds(),
        Some((BigInt::from(0), BigInt::from(u32::MAX)))
    );
    assert_eq!(
        Scalar::Sfixed64.bounds(),
        Some((BigInt::from(i64::MIN), BigInt::from(i64::MAX)))
    );
    assert_eq!(Scalar::Double.bounds(), None);
    assert_eq!(Scalar::ALL.iter().filter(|s| s.is_integer()).count(), 10);

    let schema = Schema::new();
    assert_eq!(
        schema.bounds_hint(Ty::scalar(Scalar::Uint32), &BigInt::from(-1)),
        Some("-1 is outside the uint32 range 0..=4294967295".to_owned())
    );
    assert_eq!(schema.bounds_hint(Ty::scalar(Scalar::Int32), &BigInt::from(5)), None);
}

#[test]
fn json_names_are_lower_camel_case() {
    let field = FieldDef::new("created_at_time", 1, Ty::scalar(Scalar::Int64));
    assert_eq!(field.json_name(), "createdAtTime");
    assert_eq!(FieldDef::new("id", 2, Ty::scalar(Scalar::Int64)).json_name(), "id");
}
