use super::*;
use crate::Idx;

#[test]
fn primitive_tags_match_fixed_indices() {
    for raw in 0..Idx::PRIMITIVE_COUNT {
        let tag = Tag::primitive(raw).expect("every fixed index has a tag");
        assert_eq!(u32::from(tag as u8), raw);
        assert!(tag.is_primitive());
    }
    assert_eq!(Tag::primitive(Idx::PRIMITIVE_COUNT), None);
}

#[test]
fn numeric_classification() {
    assert!(Tag::Nat8.is_fixed_nat());
    assert!(Tag::Int64.is_fixed_int());
    assert!(Tag::Nat.is_integer());
    assert!(!Tag::Nat.is_fixed_nat());
    assert!(Tag::Float32.is_numeric());
    assert!(!Tag::Text.is_numeric());
    assert_eq!(Tag::Nat16.bits(), Some(16));
    assert_eq!(Tag::Nat.bits(), None);
}

#[test]
fn extra_users() {
    assert!(Tag::Record.uses_extra());
    assert!(Tag::Func.uses_extra());
    assert!(!Tag::Vec.uses_extra());
    assert!(!Tag::Rec.uses_extra());
}
