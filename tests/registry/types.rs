//! Integration tests for type registration and payload validation.

use worldsmith_foundation::{ErrorKind, FieldKind, RecordClass, Value};
use worldsmith_registry::{FieldDef, Payload, TypeDef, TypeRegistry};

fn payload(pairs: &[(&str, Value)]) -> Payload {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn register_and_resolve_by_key() {
    let mut registry = TypeRegistry::new();
    let npc = registry
        .register(
            TypeDef::new(RecordClass::Entity, "npc", "NPC")
                .with_field(FieldDef::new("role", FieldKind::Text)),
        )
        .unwrap();
    let city = registry
        .register(TypeDef::new(RecordClass::Location, "city", "City"))
        .unwrap();

    assert_eq!(registry.by_key(RecordClass::Entity, "npc"), Some(npc));
    assert_eq!(registry.by_key(RecordClass::Location, "city"), Some(city));
    assert_eq!(registry.by_key(RecordClass::Entity, "city"), None);

    let entities: Vec<_> = registry
        .iter_class(RecordClass::Entity)
        .map(|t| t.key.as_str())
        .collect();
    assert_eq!(entities, ["npc"]);
}

#[test]
fn validation_covers_kinds_options_and_required() {
    let mut registry = TypeRegistry::new();
    let npc = registry
        .register(
            TypeDef::new(RecordClass::Entity, "npc", "NPC")
                .with_field(FieldDef::new("name", FieldKind::Text).required())
                .with_field(
                    FieldDef::new("disposition", FieldKind::Choice)
                        .with_options(["friendly", "hostile"]),
                )
                .with_field(FieldDef::new("age", FieldKind::Int)),
        )
        .unwrap();

    // Conforming payload
    let good = payload(&[
        ("name", Value::text("Barliman")),
        ("disposition", Value::choice("friendly")),
        ("age", Value::Int(52)),
    ]);
    assert!(registry.validate_payload(npc, &good).is_ok());

    // Wrong kind
    let bad_kind = payload(&[("name", Value::text("x")), ("age", Value::text("old"))]);
    let err = registry.validate_payload(npc, &bad_kind).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FieldTypeMismatch { .. }));

    // Option not in the list
    let bad_choice = payload(&[
        ("name", Value::text("x")),
        ("disposition", Value::choice("indifferent")),
    ]);
    let err = registry.validate_payload(npc, &bad_choice).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownChoice { .. }));

    // Required field nil
    let nil_required = payload(&[("name", Value::Nil)]);
    let err = registry.validate_payload(npc, &nil_required).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingField { .. }));
}

#[test]
fn date_fields_accept_dates_only() {
    let mut registry = TypeRegistry::new();
    let event = registry
        .register(
            TypeDef::new(RecordClass::Entity, "event", "Event")
                .with_field(FieldDef::new("when", FieldKind::Date).required()),
        )
        .unwrap();

    let day = chrono::NaiveDate::from_ymd_opt(1347, 6, 21).unwrap();
    let good = payload(&[("when", Value::Date(day))]);
    assert!(registry.validate_payload(event, &good).is_ok());

    let bad = payload(&[("when", Value::text("midsummer"))]);
    let err = registry.validate_payload(event, &bad).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FieldTypeMismatch { .. }));
}

#[test]
fn reference_fields_carry_target_constraints() {
    let mut registry = TypeRegistry::new();
    let city = registry
        .register(TypeDef::new(RecordClass::Location, "city", "City"))
        .unwrap();
    let npc = registry
        .register(
            TypeDef::new(RecordClass::Entity, "npc", "NPC")
                .with_field(FieldDef::new("home", FieldKind::LocationRef).with_target(city)),
        )
        .unwrap();

    let def = registry.get(npc).unwrap();
    let home = def.field("home").unwrap();
    assert_eq!(home.reference_target, Some(city));
    assert_eq!(home.kind, FieldKind::LocationRef);
}

#[test]
fn schema_evolves_after_registration() {
    let mut registry = TypeRegistry::new();
    let npc = registry
        .register(TypeDef::new(RecordClass::Entity, "npc", "NPC"))
        .unwrap();

    registry
        .add_field(npc, FieldDef::new("role", FieldKind::Text).required())
        .unwrap();

    // Existing validation picks up the new field
    let err = registry.validate_payload(npc, &Payload::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingField { .. }));

    registry.remove_field(npc, "role").unwrap();
    assert!(registry.validate_payload(npc, &Payload::new()).is_ok());
}

#[test]
fn field_order_follows_sort_order() {
    let mut registry = TypeRegistry::new();
    let npc = registry
        .register(
            TypeDef::new(RecordClass::Entity, "npc", "NPC")
                .with_field(FieldDef::new("notes", FieldKind::Text).with_sort_order(10))
                .with_field(FieldDef::new("name", FieldKind::Text).with_sort_order(1))
                .with_field(FieldDef::new("role", FieldKind::Text).with_sort_order(2)),
        )
        .unwrap();

    let keys: Vec<_> = registry
        .get(npc)
        .unwrap()
        .fields()
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    assert_eq!(keys, ["name", "role", "notes"]);
}
