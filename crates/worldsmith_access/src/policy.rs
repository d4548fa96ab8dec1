//! Visibility defaults, access policies, and campaign overrides.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::{CampaignId, CharacterId, UserId};

use crate::viewer::Viewer;

/// Per-record default exposure.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Visibility {
    /// All fields exposed to admitted viewers.
    #[default]
    Visible,
    /// Only fields flagged visible are exposed to admitted viewers.
    Partial,
    /// Not exposed at all by default; only owner and game master see it.
    Hidden,
}

/// Access gate for one direction (read or write).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccessLevel {
    /// Everyone is admitted.
    Global,
    /// Admitted when the viewer matches any allow-list dimension.
    Selective,
    /// Nobody but owner and game master; the record stays out of listings.
    Hidden,
    /// Nobody but the owner (and game master).
    OwnerOnly,
}

/// Allow-lists of campaign, user, and character ids.
///
/// A viewer matches when their selected campaign, their user id, or their
/// active character appears in the corresponding set. Empty lists admit
/// nobody; they are allow-lists, not "unset" markers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllowList {
    /// Admitted campaigns.
    pub campaigns: BTreeSet<CampaignId>,
    /// Admitted users.
    pub users: BTreeSet<UserId>,
    /// Admitted characters.
    pub characters: BTreeSet<CharacterId>,
}

impl AllowList {
    /// Creates an empty allow-list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a campaign.
    #[must_use]
    pub fn with_campaign(mut self, campaign: CampaignId) -> Self {
        self.campaigns.insert(campaign);
        self
    }

    /// Admits a user.
    #[must_use]
    pub fn with_user(mut self, user: UserId) -> Self {
        self.users.insert(user);
        self
    }

    /// Admits a character.
    #[must_use]
    pub fn with_character(mut self, character: CharacterId) -> Self {
        self.characters.insert(character);
        self
    }

    /// Returns true if no dimension admits anyone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty() && self.users.is_empty() && self.characters.is_empty()
    }

    /// Checks whether the viewer matches any dimension.
    #[must_use]
    pub fn admits(&self, viewer: &Viewer) -> bool {
        viewer
            .campaign
            .is_some_and(|c| self.campaigns.contains(&c))
            || self.users.contains(&viewer.user)
            || viewer
                .character
                .is_some_and(|c| self.characters.contains(&c))
    }
}

/// Fine-grained read/write permission for a record.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccessPolicy {
    /// Read gate.
    pub read: AccessLevel,
    /// Allow-lists consulted when `read` is selective.
    pub read_allow: AllowList,
    /// Write gate.
    pub write: AccessLevel,
    /// Allow-lists consulted when `write` is selective.
    pub write_allow: AllowList,
}

impl Default for AccessPolicy {
    /// Readable by everyone, writable by the owner.
    fn default() -> Self {
        Self {
            read: AccessLevel::Global,
            read_allow: AllowList::new(),
            write: AccessLevel::OwnerOnly,
            write_allow: AllowList::new(),
        }
    }
}

impl AccessPolicy {
    /// Creates the default policy (global read, owner-only write).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the read gate.
    #[must_use]
    pub fn with_read(mut self, level: AccessLevel) -> Self {
        self.read = level;
        self
    }

    /// Sets the read allow-lists.
    #[must_use]
    pub fn with_read_allow(mut self, allow: AllowList) -> Self {
        self.read_allow = allow;
        self
    }

    /// Sets the write gate.
    #[must_use]
    pub fn with_write(mut self, level: AccessLevel) -> Self {
        self.write = level;
        self
    }

    /// Sets the write allow-lists.
    #[must_use]
    pub fn with_write_allow(mut self, allow: AllowList) -> Self {
        self.write_allow = allow;
        self
    }
}

/// Campaign-scoped tag for how central a record is to that campaign.
///
/// Variant order is display priority: critical sorts before important,
/// important before medium.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Importance {
    /// Central to the campaign.
    Critical,
    /// Worth keeping in view.
    Important,
    /// Background material.
    Medium,
}

/// Per-campaign override layer for one record.
///
/// Applied only when the viewer has that campaign selected. The visibility
/// override replaces the record's own default; the importance tag feeds
/// campaign-scoped listings. Neither widens the access-level gate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CampaignOverride {
    /// Replacement visibility, if any.
    pub visibility: Option<Visibility>,
    /// Importance tag, if any.
    pub importance: Option<Importance>,
}

impl CampaignOverride {
    /// Creates an empty override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the visibility override.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Sets the importance tag.
    #[must_use]
    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = Some(importance);
        self
    }
}
