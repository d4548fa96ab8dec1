//! Integration tests for the read-exposure matrix.

use worldsmith_access::{
    AccessLevel, AccessPolicy, AllowList, CampaignOverride, Exposure, Viewer, Visibility,
    read_exposure, read_exposure_with_override,
};
use worldsmith_foundation::{CampaignId, CharacterId, UserId};

const OWNER: UserId = UserId::new(1);
const OTHER: UserId = UserId::new(2);

#[test]
fn full_matrix_of_level_and_visibility() {
    let viewer = Viewer::new(OTHER);
    let cases = [
        (AccessLevel::Global, Visibility::Visible, Exposure::Full),
        (AccessLevel::Global, Visibility::Partial, Exposure::Partial),
        (AccessLevel::Global, Visibility::Hidden, Exposure::None),
        (AccessLevel::Hidden, Visibility::Visible, Exposure::None),
        (AccessLevel::Hidden, Visibility::Partial, Exposure::None),
        (AccessLevel::OwnerOnly, Visibility::Visible, Exposure::None),
    ];

    for (level, visibility, expected) in cases {
        let policy = AccessPolicy::new().with_read(level);
        assert_eq!(
            read_exposure(OWNER, visibility, &policy, &viewer),
            expected,
            "{level:?} / {visibility:?}"
        );
    }
}

#[test]
fn selective_without_matching_dimension_behaves_like_hidden() {
    let policy = AccessPolicy::new()
        .with_read(AccessLevel::Selective)
        .with_read_allow(AllowList::new().with_user(UserId::new(99)));

    assert_eq!(
        read_exposure(OWNER, Visibility::Visible, &policy, &Viewer::new(OTHER)),
        Exposure::None
    );
}

#[test]
fn selective_empty_allow_list_admits_nobody() {
    let policy = AccessPolicy::new().with_read(AccessLevel::Selective);
    let viewer = Viewer::new(OTHER)
        .in_campaign(CampaignId::new(1))
        .as_character(CharacterId::new(1));

    assert_eq!(
        read_exposure(OWNER, Visibility::Visible, &policy, &viewer),
        Exposure::None
    );
}

#[test]
fn selective_campaign_dimension_requires_selection() {
    let policy = AccessPolicy::new()
        .with_read(AccessLevel::Selective)
        .with_read_allow(AllowList::new().with_campaign(CampaignId::new(4)));

    // Without selecting the campaign, no match
    assert_eq!(
        read_exposure(OWNER, Visibility::Visible, &policy, &Viewer::new(OTHER)),
        Exposure::None
    );

    // Selecting another campaign does not help
    let elsewhere = Viewer::new(OTHER).in_campaign(CampaignId::new(5));
    assert_eq!(
        read_exposure(OWNER, Visibility::Visible, &policy, &elsewhere),
        Exposure::None
    );

    // Selecting the admitted campaign does
    let selected = Viewer::new(OTHER).in_campaign(CampaignId::new(4));
    assert_eq!(
        read_exposure(OWNER, Visibility::Visible, &policy, &selected),
        Exposure::Full
    );
}

#[test]
fn owner_and_game_master_bypass_everything() {
    let policy = AccessPolicy::new().with_read(AccessLevel::OwnerOnly);

    assert_eq!(
        read_exposure(OWNER, Visibility::Hidden, &policy, &Viewer::new(OWNER)),
        Exposure::Full
    );

    let gm = Viewer::new(OTHER).in_campaign(CampaignId::new(1)).game_master();
    assert_eq!(
        read_exposure(OWNER, Visibility::Hidden, &policy, &gm),
        Exposure::Full
    );
}

#[test]
fn override_layers_compose_with_the_gate() {
    let viewer = Viewer::new(OTHER).in_campaign(CampaignId::new(1));

    // Override can tighten...
    let policy = AccessPolicy::new();
    let conceal = CampaignOverride::new().with_visibility(Visibility::Partial);
    assert_eq!(
        read_exposure_with_override(OWNER, Visibility::Visible, &policy, Some(&conceal), &viewer),
        Exposure::Partial
    );

    // ...and loosen visibility, but never the gate itself
    let locked = AccessPolicy::new().with_read(AccessLevel::Hidden);
    let reveal = CampaignOverride::new().with_visibility(Visibility::Visible);
    assert_eq!(
        read_exposure_with_override(OWNER, Visibility::Hidden, &locked, Some(&reveal), &viewer),
        Exposure::None
    );
}
