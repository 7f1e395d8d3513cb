use super::*;
use pretty_assertions::assert_eq;

#[test]
fn primitive_indices_are_contiguous() {
    assert_eq!(Idx::NULL.raw(), 0);
    assert_eq!(Idx::PRINCIPAL.raw(), Idx::PRIMITIVE_COUNT - 1);
    assert!(Idx::TEXT.is_primitive());
    assert!(!Idx::from_raw(Idx::FIRST_DYNAMIC).is_primitive());
}

#[test]
fn names_and_formatting() {
    assert_eq!(Idx::NAT8.name(), Some("nat8"));
    assert_eq!(Idx::from_raw(40).name(), None);
    assert_eq!(format!("{:?}", Idx::NAT64), "Idx::NAT64");
    assert_eq!(format!("{:?}", Idx::NONE), "Idx::NONE");
    assert_eq!(Idx::from_raw(40).to_string(), "type#40");
}
