//! Default and validation properties over generated message schemas.

use proptest::prelude::*;
use serde_json::{json, Value as Json};
use sonde_proto::{validate, Cardinality, FieldDef, Kind, MessageId, Scalar, Schema, Ty, Value};

#[derive(Clone, Debug)]
enum FieldShape {
    Scalar(Scalar),
    Enum,
    /// A field of the message being generated.
    SelfRef,
    Nested(Vec<(FieldShape, Cardinality)>),
}

fn cardinality() -> impl Strategy<Value = Cardinality> {
    prop_oneof![
        Just(Cardinality::Single),
        Just(Cardinality::Optional),
        Just(Cardinality::Repeated),
    ]
}

fn field_shape() -> impl Strategy<Value = FieldShape> {
    let leaf = prop_oneof![
        prop::sample::select(Scalar::ALL.to_vec()).prop_map(FieldShape::Scalar),
        Just(FieldShape::Enum),
        Just(FieldShape::SelfRef),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec((inner, cardinality()), 0..4).prop_map(FieldShape::Nested)
    })
}

fn message_fields() -> impl Strategy<Value = Vec<(FieldShape, Cardinality)>> {
    prop::collection::vec((field_shape(), cardinality()), 0..5)
}

fn build(fields: &[(FieldShape, Cardinality)]) -> (Schema, MessageId) {
    let mut schema = Schema::new();
    let color = schema
        .add_enum("Color", &[("COLOR_UNSPECIFIED", 0), ("RED", 1)])
        .expect("enum");
    let mut counter = 0;
    let root = define(&mut schema, color, fields, &mut counter);
    (schema, root)
}

fn define(
    schema: &mut Schema,
    color: sonde_proto::EnumId,
    fields: &[(FieldShape, Cardinality)],
    counter: &mut usize,
) -> MessageId {
    let id = schema.declare_message(format!("M{counter}"));
    *counter += 1;
    let defs = fields
        .iter()
        .enumerate()
        .map(|(i, (shape, cardinality))| {
            let kind = match shape {
                FieldShape::Scalar(s) => Kind::Scalar(*s),
                FieldShape::Enum => Kind::Enum(color),
                FieldShape::SelfRef => Kind::Message(id),
                FieldShape::Nested(inner) => Kind::Message(define(schema, color, inner, counter)),
            };
            let number = u32::try_from(i + 1).unwrap_or(u32::MAX);
            FieldDef::new(
                format!("f{i}"),
                number,
                Ty {
                    kind,
                    cardinality: *cardinality,
                },
            )
        })
        .collect();
    schema.define_message(id, defs).expect("unique fields");
    id
}

proptest! {
    #[test]
    fn defaults_validate(fields in message_fields()) {
        let (schema, root) = build(&fields);
        let ty = Ty::message(root);
        let input = schema.default_input(ty);
        let result = validate(&schema, ty, &input);
        prop_assert!(result.is_ok(), "{input}: {result:?}");
    }

    #[test]
    fn repeated_fields_accept_any_non_array_as_empty(
        scalar in prop::sample::select(Scalar::ALL.to_vec()),
        input in prop_oneof![
            Just(Json::Null),
            any::<bool>().prop_map(Json::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z0-9]{0,6}".prop_map(Json::String),
            Just(json!({ "0": 1 })),
        ],
    ) {
        let schema = Schema::new();
        let ty = Ty::scalar(scalar).repeated();
        prop_assert_eq!(validate(&schema, ty, &input), Ok(Value::List(Vec::new())));
    }
}
