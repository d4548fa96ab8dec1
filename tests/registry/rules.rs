//! Integration tests for the field display rule engine.

use worldsmith_foundation::{ErrorKind, FieldKind, RecordClass, Value};
use worldsmith_registry::{
    Condition, ConditionOp, FieldDef, FieldRule, MatchMode, Payload, RuleAction, TypeDef,
    TypeRegistry,
};

fn payload(pairs: &[(&str, Value)]) -> Payload {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn creature_type() -> TypeDef {
    TypeDef::new(RecordClass::Entity, "creature", "Creature")
        .with_field(
            FieldDef::new("kind", FieldKind::Choice).with_options(["beast", "undead", "construct"]),
        )
        .with_field(FieldDef::new("diet", FieldKind::Text).with_sort_order(1))
        .with_field(FieldDef::new("creator", FieldKind::Text).with_sort_order(2))
        .with_rule(
            FieldRule::new("undead-do-not-eat", MatchMode::Any)
                .with_condition(Condition::equals("kind", Value::choice("undead")))
                .with_condition(Condition::equals("kind", Value::choice("construct")))
                .with_action(RuleAction::Hide("diet".into())),
        )
        .with_rule(
            FieldRule::new("constructs-have-creators", MatchMode::All)
                .with_condition(Condition::equals("kind", Value::choice("construct")))
                .with_action(RuleAction::Require("creator".into())),
        )
}

#[test]
fn rules_reshape_the_effective_schema() {
    let def = creature_type();

    let beast = payload(&[("kind", Value::choice("beast"))]);
    let keys: Vec<_> = def
        .effective_fields(&beast)
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    assert_eq!(keys, ["kind", "diet", "creator"]);

    let undead = payload(&[("kind", Value::choice("undead"))]);
    let keys: Vec<_> = def
        .effective_fields(&undead)
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    assert_eq!(keys, ["kind", "creator"]);
}

#[test]
fn any_mode_matches_either_condition() {
    let def = creature_type();

    for kind in ["undead", "construct"] {
        let p = payload(&[("kind", Value::choice(kind))]);
        let outcome = def.rule_outcome(&p);
        assert!(outcome.is_hidden("diet"), "{kind} should hide diet");
    }

    let beast = payload(&[("kind", Value::choice("beast"))]);
    assert!(!def.rule_outcome(&beast).is_hidden("diet"));
}

#[test]
fn rule_required_fields_gate_validation() {
    let mut registry = TypeRegistry::new();
    let creature = registry.register(creature_type()).unwrap();

    // A construct without a creator fails
    let construct = payload(&[("kind", Value::choice("construct"))]);
    let err = registry.validate_payload(creature, &construct).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingField { .. }));

    // With the creator it passes, diet stays hidden and optional
    let complete = payload(&[
        ("kind", Value::choice("construct")),
        ("creator", Value::text("The Artificer")),
    ]);
    assert!(registry.validate_payload(creature, &complete).is_ok());
}

#[test]
fn none_mode_and_ordering_conditions() {
    let def = TypeDef::new(RecordClass::Entity, "site", "Site")
        .with_field(FieldDef::new("danger", FieldKind::Int))
        .with_field(FieldDef::new("warning", FieldKind::Text).with_sort_order(1))
        .with_rule(
            FieldRule::new("safe-sites-have-no-warning", MatchMode::None)
                .with_condition(Condition::new(
                    "danger",
                    ConditionOp::GreaterThan,
                    Value::Int(3),
                ))
                .with_action(RuleAction::Hide("warning".into())),
        );

    let safe = payload(&[("danger", Value::Int(1))]);
    assert!(def.rule_outcome(&safe).is_hidden("warning"));

    let perilous = payload(&[("danger", Value::Int(7))]);
    assert!(!def.rule_outcome(&perilous).is_hidden("warning"));
}

#[test]
fn presence_conditions_drive_rules() {
    let def = TypeDef::new(RecordClass::Entity, "npc", "NPC")
        .with_field(FieldDef::new("faction", FieldKind::Text))
        .with_field(FieldDef::new("rank", FieldKind::Text).with_sort_order(1))
        .with_rule(
            FieldRule::new("rank-needs-faction", MatchMode::All)
                .with_condition(Condition::new("faction", ConditionOp::IsNotSet, Value::Nil))
                .with_action(RuleAction::Hide("rank".into())),
        );

    let unaffiliated = payload(&[]);
    assert!(def.rule_outcome(&unaffiliated).is_hidden("rank"));

    let member = payload(&[("faction", Value::text("Guild"))]);
    assert!(!def.rule_outcome(&member).is_hidden("rank"));
}
