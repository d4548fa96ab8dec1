//! The requesting context reads and writes are evaluated against.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::{CampaignId, CharacterId, UserId};

/// The user, selected campaign, and active character a request runs as.
///
/// The `game_master` flag is resolved by the store layer from the selected
/// campaign's membership; being a game master elsewhere grants nothing
/// here. The evaluator treats a game master like the record owner.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewer {
    /// The requesting user.
    pub user: UserId,
    /// The campaign selected for this request, if any.
    pub campaign: Option<CampaignId>,
    /// The character the user is acting as, if any.
    pub character: Option<CharacterId>,
    /// Whether the user is a game master of the selected campaign.
    pub game_master: bool,
}

impl Viewer {
    /// Creates a viewer with no campaign or character context.
    #[must_use]
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            campaign: None,
            character: None,
            game_master: false,
        }
    }

    /// Selects a campaign.
    #[must_use]
    pub fn in_campaign(mut self, campaign: CampaignId) -> Self {
        self.campaign = Some(campaign);
        self
    }

    /// Acts as a character.
    #[must_use]
    pub fn as_character(mut self, character: CharacterId) -> Self {
        self.character = Some(character);
        self
    }

    /// Marks the viewer as game master of the selected campaign.
    #[must_use]
    pub fn game_master(mut self) -> Self {
        self.game_master = true;
        self
    }
}
