//! Integration tests for notes and notifications.

use worldsmith_access::{Viewer, Visibility};
use worldsmith_foundation::{ErrorKind, RecordClass, UserId};
use worldsmith_registry::TypeDef;
use worldsmith_store::{CampaignRole, NoteAudience, NotificationKind, RecordDraft, World};

const GM: UserId = UserId::new(1);
const PLAYER: UserId = UserId::new(2);
const STRANGER: UserId = UserId::new(3);

fn world_with_record() -> (World, worldsmith_foundation::RecordId) {
    let mut world = World::new();
    let npc = world
        .register_entity_type(TypeDef::new(RecordClass::Entity, "npc", "NPC"))
        .unwrap();
    let record = world
        .create_record(RecordDraft::entity(npc, "Barliman", GM))
        .unwrap();
    (world, record)
}

#[test]
fn audiences_gate_note_reads() {
    let (mut world, record) = world_with_record();
    let campaign = world.create_campaign("Sunken Keep", GM);
    world
        .invite(GM, campaign, PLAYER, CampaignRole::Player)
        .unwrap();

    let gm_viewer = Viewer::new(GM);
    world
        .add_note(&gm_viewer, record, "gm only", NoteAudience::Private)
        .unwrap();
    world
        .add_note(
            &gm_viewer,
            record,
            "for the table",
            NoteAudience::Campaign(campaign),
        )
        .unwrap();
    world
        .add_note(&gm_viewer, record, "for anyone", NoteAudience::Everyone)
        .unwrap();

    // The author reads all three
    assert_eq!(world.notes_on(&gm_viewer, record).len(), 3);

    // A campaign member reads the campaign note and the public one
    let bodies: Vec<_> = world
        .notes_on(&Viewer::new(PLAYER), record)
        .iter()
        .map(|n| n.body.clone())
        .collect();
    assert_eq!(bodies, ["for the table", "for anyone"]);

    // A stranger reads only the public one
    let bodies: Vec<_> = world
        .notes_on(&Viewer::new(STRANGER), record)
        .iter()
        .map(|n| n.body.clone())
        .collect();
    assert_eq!(bodies, ["for anyone"]);
}

#[test]
fn user_audience_notifies_each_listed_user() {
    let (mut world, record) = world_with_record();
    let gm_viewer = Viewer::new(GM);

    let note = world
        .add_note(
            &gm_viewer,
            record,
            "look at this",
            NoteAudience::Users([PLAYER, STRANGER].into_iter().collect()),
        )
        .unwrap();

    for user in [PLAYER, STRANGER] {
        let queued = world.notifications_for(user);
        assert_eq!(queued.len(), 1);
        assert!(matches!(
            queued[0].kind,
            NotificationKind::NoteShared { note: n, .. } if n == note
        ));
    }

    // The author is not notified about their own note
    assert_eq!(world.unread_count(GM), 0);
}

#[test]
fn notes_require_a_readable_record() {
    let (mut world, record) = world_with_record();
    let gm_viewer = Viewer::new(GM);
    world
        .set_visibility(&gm_viewer, record, Visibility::Hidden)
        .unwrap();

    let err = world
        .add_note(
            &Viewer::new(STRANGER),
            record,
            "shouting into the void",
            NoteAudience::Everyone,
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AccessDenied { .. }));

    // Even an Everyone note on a hidden record stays invisible to others
    world
        .add_note(&gm_viewer, record, "still secret", NoteAudience::Everyone)
        .unwrap();
    assert!(world.notes_on(&Viewer::new(STRANGER), record).is_empty());
}

#[test]
fn only_the_author_edits_or_deletes() {
    let (mut world, record) = world_with_record();
    let gm_viewer = Viewer::new(GM);
    let note = world
        .add_note(&gm_viewer, record, "draft", NoteAudience::Everyone)
        .unwrap();

    assert!(matches!(
        world.edit_note(PLAYER, note, "defaced").unwrap_err().kind,
        ErrorKind::AccessDenied { .. }
    ));
    assert!(matches!(
        world.delete_note(PLAYER, note).unwrap_err().kind,
        ErrorKind::AccessDenied { .. }
    ));

    world.edit_note(GM, note, "final").unwrap();
    assert_eq!(world.notes_on(&gm_viewer, record)[0].body, "final");

    world.delete_note(GM, note).unwrap();
    assert!(world.notes_on(&gm_viewer, record).is_empty());
}

#[test]
fn notification_read_flow() {
    let (mut world, record) = world_with_record();
    let gm_viewer = Viewer::new(GM);

    world
        .add_note(
            &gm_viewer,
            record,
            "one",
            NoteAudience::Users([PLAYER].into_iter().collect()),
        )
        .unwrap();
    world
        .add_note(
            &gm_viewer,
            record,
            "two",
            NoteAudience::Users([PLAYER].into_iter().collect()),
        )
        .unwrap();

    assert_eq!(world.unread_count(PLAYER), 2);

    let first = world.notifications_for(PLAYER)[0].id;
    assert!(world.mark_read(PLAYER, first));
    assert_eq!(world.unread_count(PLAYER), 1);

    // Marking again is idempotent
    assert!(world.mark_read(PLAYER, first));
    assert_eq!(world.unread_count(PLAYER), 1);

    world.mark_all_read(PLAYER);
    assert_eq!(world.unread_count(PLAYER), 0);
}

#[test]
fn destroying_a_record_drops_its_notes() {
    let (mut world, record) = world_with_record();
    let gm_viewer = Viewer::new(GM);
    world
        .add_note(&gm_viewer, record, "doomed", NoteAudience::Everyone)
        .unwrap();

    world.destroy_record(&gm_viewer, record).unwrap();
    assert!(world.notes_on(&gm_viewer, record).is_empty());
}
