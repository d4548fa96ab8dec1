//! Integration tests for typed links through the World facade.

use worldsmith_access::{AccessPolicy, Viewer, Visibility};
use worldsmith_foundation::{ErrorKind, RecordClass, TypeId, UserId};
use worldsmith_registry::{RelationshipType, TypeDef};
use worldsmith_store::{RecordDraft, World};

const OWNER: UserId = UserId::new(1);
const OTHER: UserId = UserId::new(2);

struct Setup {
    world: World,
    person: TypeId,
    faction: TypeId,
    city: TypeId,
}

fn setup() -> Setup {
    let mut world = World::new();
    let person = world
        .register_entity_type(TypeDef::new(RecordClass::Entity, "person", "Person"))
        .unwrap();
    let faction = world
        .register_entity_type(TypeDef::new(RecordClass::Entity, "faction", "Faction"))
        .unwrap();
    let city = world
        .register_location_type(TypeDef::new(RecordClass::Location, "city", "City"))
        .unwrap();

    world
        .define_relationship(
            RelationshipType::new("member-of", "member of")
                .with_reverse_name("has member")
                .allow_from(person)
                .allow_to(faction),
        )
        .unwrap();
    world
        .define_relationship(RelationshipType::new("knows", "knows"))
        .unwrap();

    Setup {
        world,
        person,
        faction,
        city,
    }
}

#[test]
fn links_only_between_entities() {
    let Setup {
        mut world,
        person,
        city,
        ..
    } = setup();

    let iris = world
        .create_record(RecordDraft::entity(person, "Iris", OWNER))
        .unwrap();
    let bree = world
        .create_record(RecordDraft::location(city, "Bree", OWNER))
        .unwrap();

    let viewer = Viewer::new(OWNER);
    let err = world.link(&viewer, "knows", iris, bree).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ClassMismatch { .. }));
}

#[test]
fn unknown_relationship_key_is_rejected() {
    let Setup {
        mut world, person, ..
    } = setup();

    let a = world
        .create_record(RecordDraft::entity(person, "A", OWNER))
        .unwrap();
    let b = world
        .create_record(RecordDraft::entity(person, "B", OWNER))
        .unwrap();

    let err = world
        .link(&Viewer::new(OWNER), "sworn-enemy-of", a, b)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownRelationship(_)));
}

#[test]
fn matcher_gates_endpoint_types() {
    let Setup {
        mut world,
        person,
        faction,
        ..
    } = setup();

    let iris = world
        .create_record(RecordDraft::entity(person, "Iris", OWNER))
        .unwrap();
    let guild = world
        .create_record(RecordDraft::entity(faction, "Guild", OWNER))
        .unwrap();

    let viewer = Viewer::new(OWNER);
    world.link(&viewer, "member-of", iris, guild).unwrap();

    let err = world.link(&viewer, "member-of", guild, iris).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EndpointRejected { .. }));

    // What the editor would offer for this pair
    let offered: Vec<_> = world
        .relationships_between(world.view(&viewer, iris).unwrap().type_id, faction)
        .iter()
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(offered, ["knows", "member-of"]);
}

#[test]
fn link_reads_are_filtered_on_both_ends() {
    let Setup {
        mut world,
        person,
        faction,
        ..
    } = setup();

    let iris = world
        .create_record(RecordDraft::entity(person, "Iris", OWNER))
        .unwrap();
    let guild = world
        .create_record(
            RecordDraft::entity(faction, "Hidden Hand", OWNER)
                .with_visibility(Visibility::Hidden),
        )
        .unwrap();
    let circle = world
        .create_record(RecordDraft::entity(faction, "Open Circle", OWNER))
        .unwrap();

    let owner = Viewer::new(OWNER);
    world.link(&owner, "member-of", iris, guild).unwrap();
    world.link(&owner, "member-of", iris, circle).unwrap();

    // The owner sees both memberships
    assert_eq!(world.links_from(&owner, iris).len(), 2);

    // A stranger only sees the visible end
    let stranger = Viewer::new(OTHER);
    let links = world.links_from(&stranger, iris);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].1.name, "Open Circle");

    // Reverse traversal from the visible faction works too
    let members = world.links_to(&stranger, circle);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].1.name, "Iris");

    // From the hidden faction, a stranger sees nothing at all
    assert!(world.links_to(&stranger, guild).is_empty());
}

#[test]
fn unlink_requires_write_access_on_the_source() {
    let Setup {
        mut world,
        person,
        faction,
        ..
    } = setup();

    let iris = world
        .create_record(
            RecordDraft::entity(person, "Iris", OWNER).with_policy(AccessPolicy::new()),
        )
        .unwrap();
    let guild = world
        .create_record(RecordDraft::entity(faction, "Guild", OWNER))
        .unwrap();

    let owner = Viewer::new(OWNER);
    world.link(&owner, "member-of", iris, guild).unwrap();

    let err = world
        .unlink(&Viewer::new(OTHER), "member-of", iris, guild)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AccessDenied { .. }));

    world.unlink(&owner, "member-of", iris, guild).unwrap();
    assert!(world.links_from(&owner, iris).is_empty());

    // Unlinking the already-removed edge is a no-op
    world.unlink(&owner, "member-of", iris, guild).unwrap();
}
