//! The read/write access evaluator.
//!
//! Every read path in the store layer runs through [`read_exposure`], every
//! write path through [`can_write`]. Evaluation order:
//!
//! 1. The record owner and a game master of the selected campaign are
//!    always admitted in full.
//! 2. The access level gates everyone else: `Global` admits, `Selective`
//!    consults the allow-lists, `Hidden` and `OwnerOnly` reject.
//! 3. For reads, visibility (with any campaign override already applied)
//!    caps the admitted exposure.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::UserId;

use crate::policy::{AccessLevel, AccessPolicy, AllowList, CampaignOverride, Visibility};
use crate::viewer::Viewer;

/// The evaluator's read decision for one record.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Exposure {
    /// All fields readable.
    Full,
    /// Only fields flagged visible are readable.
    Partial,
    /// The record behaves as if it did not exist.
    None,
}

impl Exposure {
    /// Returns true if the record is readable at all.
    #[must_use]
    pub const fn is_readable(self) -> bool {
        !matches!(self, Self::None)
    }
}

fn admitted(level: AccessLevel, allow: &AllowList, viewer: &Viewer) -> bool {
    match level {
        AccessLevel::Global => true,
        AccessLevel::Selective => allow.admits(viewer),
        AccessLevel::Hidden | AccessLevel::OwnerOnly => false,
    }
}

/// Computes the read exposure of a record for a viewer.
#[must_use]
pub fn read_exposure(
    owner: UserId,
    visibility: Visibility,
    policy: &AccessPolicy,
    viewer: &Viewer,
) -> Exposure {
    if viewer.user == owner || viewer.game_master {
        return Exposure::Full;
    }

    if !admitted(policy.read, &policy.read_allow, viewer) {
        return Exposure::None;
    }

    match visibility {
        Visibility::Visible => Exposure::Full,
        Visibility::Partial => Exposure::Partial,
        Visibility::Hidden => Exposure::None,
    }
}

/// Computes read exposure with a campaign override layer applied.
///
/// The override's visibility, when present, replaces the record's own
/// before the cap in step 3. The caller passes the override of the
/// viewer's *selected* campaign only.
#[must_use]
pub fn read_exposure_with_override(
    owner: UserId,
    visibility: Visibility,
    policy: &AccessPolicy,
    campaign_override: Option<&CampaignOverride>,
    viewer: &Viewer,
) -> Exposure {
    let effective = campaign_override
        .and_then(|o| o.visibility)
        .unwrap_or(visibility);
    read_exposure(owner, effective, policy, viewer)
}

/// Checks whether a viewer may modify a record.
///
/// Visibility never affects writes; a viewer can hold selective write
/// access to a record they only partially see.
#[must_use]
pub fn can_write(owner: UserId, policy: &AccessPolicy, viewer: &Viewer) -> bool {
    if viewer.user == owner || viewer.game_master {
        return true;
    }
    admitted(policy.write, &policy.write_allow, viewer)
}
