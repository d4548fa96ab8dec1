//! Integration tests for relationship type matching.

use worldsmith_foundation::{ErrorKind, RecordClass};
use worldsmith_registry::{RelationshipRegistry, RelationshipType, TypeDef, TypeRegistry};

#[test]
fn matcher_offers_only_valid_types() {
    let mut types = TypeRegistry::new();
    let person = types
        .register(TypeDef::new(RecordClass::Entity, "person", "Person"))
        .unwrap();
    let faction = types
        .register(TypeDef::new(RecordClass::Entity, "faction", "Faction"))
        .unwrap();
    let item = types
        .register(TypeDef::new(RecordClass::Entity, "item", "Item"))
        .unwrap();

    let mut rels = RelationshipRegistry::new();
    rels.define(RelationshipType::new("knows", "knows")).unwrap();
    rels.define(
        RelationshipType::new("member-of", "member of")
            .with_reverse_name("has member")
            .allow_from(person)
            .allow_to(faction),
    )
    .unwrap();
    rels.define(
        RelationshipType::new("owns", "owns")
            .allow_from(person)
            .allow_to(item),
    )
    .unwrap();

    let offered: Vec<_> = rels
        .valid_between(person, faction)
        .iter()
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(offered, ["knows", "member-of"]);

    let offered: Vec<_> = rels
        .valid_between(faction, item)
        .iter()
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(offered, ["knows"]);
}

#[test]
fn multiple_allowed_types_per_role() {
    let person = worldsmith_foundation::TypeId::new(0);
    let beast = worldsmith_foundation::TypeId::new(1);
    let location_like = worldsmith_foundation::TypeId::new(2);

    let rel = RelationshipType::new("guards", "guards")
        .allow_from(person)
        .allow_from(beast);

    assert!(rel.allows(person, location_like));
    assert!(rel.allows(beast, location_like));
    assert!(!rel.allows(location_like, person));
}

#[test]
fn duplicate_definitions_are_rejected() {
    let mut rels = RelationshipRegistry::new();
    rels.define(RelationshipType::new("knows", "knows")).unwrap();

    let err = rels
        .define(RelationshipType::new("knows", "is acquainted with"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateRelationship(_)));
}

#[test]
fn reverse_labels_fall_back_to_forward() {
    let labeled = RelationshipType::new("parent-of", "parent of").with_reverse_name("child of");
    assert_eq!(labeled.label(false), "child of");

    let symmetric = RelationshipType::new("allied-with", "allied with");
    assert_eq!(symmetric.label(false), "allied with");
}
