//! Persistence round-trips across the full stack.

use worldsmith_access::{AccessLevel, AccessPolicy, Viewer, Visibility};
use worldsmith_foundation::{FieldKind, RecordClass, UserId, Value};
use worldsmith_registry::{FieldDef, RelationshipType, TypeDef};
use worldsmith_store::{CampaignRole, NoteAudience, RecordDraft, World};

const GM: UserId = UserId::new(1);
const PLAYER: UserId = UserId::new(2);

fn populated_world() -> World {
    let mut world = World::new();
    let npc = world
        .register_entity_type(
            TypeDef::new(RecordClass::Entity, "npc", "NPC")
                .with_field(FieldDef::new("role", FieldKind::Text))
                .with_field(
                    FieldDef::new("secret", FieldKind::Text)
                        .hidden_in_partial()
                        .with_sort_order(1),
                ),
        )
        .unwrap();
    world
        .define_relationship(RelationshipType::new("knows", "knows"))
        .unwrap();

    let a = world
        .create_record(
            RecordDraft::entity(npc, "Aldric", GM)
                .with_visibility(Visibility::Partial)
                .with_field("role", Value::text("smith"))
                .with_field("secret", Value::text("cursed")),
        )
        .unwrap();
    let b = world
        .create_record(
            RecordDraft::entity(npc, "Brea", GM)
                .with_policy(AccessPolicy::new().with_read(AccessLevel::OwnerOnly))
                .with_field("role", Value::text("witch")),
        )
        .unwrap();

    let gm = Viewer::new(GM);
    world.link(&gm, "knows", a, b).unwrap();

    let campaign = world.create_campaign("Sunken Keep", GM);
    world.invite(GM, campaign, PLAYER, CampaignRole::Player).unwrap();
    world
        .add_note(&gm, a, "watch the forge", NoteAudience::Everyone)
        .unwrap();

    world
}

#[test]
fn msgpack_round_trip_preserves_access_semantics() {
    let world = populated_world();
    let bytes = worldsmith_runtime::to_bytes(&world).unwrap();
    let restored = worldsmith_runtime::from_bytes(&bytes).unwrap();

    // The GM still sees both records and the link
    let gm = Viewer::new(GM);
    assert_eq!(restored.visible_records(&gm).len(), 2);

    // The access model survives: a stranger sees one partial record
    let stranger = Viewer::new(UserId::new(9));
    let visible = restored.visible_records(&stranger);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Aldric");
    assert!(!visible[0].fields.contains_key("secret"));

    // Campaign membership survives
    let campaign = worldsmith_foundation::CampaignId::new(0);
    assert!(restored.viewer(PLAYER, Some(campaign), None).is_ok());

    // Notes survive
    let aldric = visible[0].id;
    assert_eq!(restored.notes_on(&stranger, aldric).len(), 1);
}

#[test]
fn file_round_trip() {
    let world = populated_world();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.world");

    worldsmith_runtime::save_to_file(&world, &path).unwrap();
    let restored = worldsmith_runtime::load_from_file(&path).unwrap();

    let gm = Viewer::new(GM);
    let names: Vec<_> = restored
        .visible_records(&gm)
        .into_iter()
        .map(|v| v.name)
        .collect();
    assert_eq!(names, ["Aldric", "Brea"]);
}

#[test]
fn json_export_round_trips_through_serde_json() {
    let world = populated_world();
    let gm = Viewer::new(GM);

    let json = worldsmith_runtime::export_visible_records(&world, &gm).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let array = parsed.as_array().unwrap();
    assert_eq!(array.len(), 2);

    // The stranger's export carries no hidden data
    let stranger = Viewer::new(UserId::new(9));
    let json = worldsmith_runtime::export_visible_records(&world, &stranger).unwrap();
    assert!(json.contains("Aldric"));
    assert!(!json.contains("Brea"));
    assert!(!json.contains("cursed"));

    let types = worldsmith_runtime::export_type_definitions(&world).unwrap();
    assert!(types.contains("\"npc\""));
}
