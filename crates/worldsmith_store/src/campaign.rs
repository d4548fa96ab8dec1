//! Campaigns: memberships, characters, and per-campaign record overrides.

use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_access::{CampaignOverride, Importance};
use worldsmith_foundation::{
    CampaignId, CharacterId, Error, ErrorKind, RecordId, Result, UserId,
};

/// A member's role within a campaign.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CampaignRole {
    /// Runs the campaign; bypasses record gates within it.
    GameMaster,
    /// Plays in the campaign.
    Player,
    /// Reads along without playing.
    Observer,
}

/// A player character registered in a campaign.
///
/// Characters are a permission dimension: record allow-lists can admit a
/// character id, and a viewer acting as that character matches.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Character {
    /// Identifier, issued by the campaign store.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// The member playing this character.
    pub owner: UserId,
}

/// A campaign: a named group of members with a per-record override layer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Campaign {
    /// Identifier, issued by the campaign store.
    pub id: CampaignId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    members: BTreeMap<UserId, CampaignRole>,
    characters: BTreeMap<CharacterId, Character>,
    overrides: HashMap<RecordId, CampaignOverride>,
}

impl Campaign {
    /// The members and their roles.
    #[must_use]
    pub fn members(&self) -> &BTreeMap<UserId, CampaignRole> {
        &self.members
    }

    /// A member's role, if they are one.
    #[must_use]
    pub fn role_of(&self, user: UserId) -> Option<CampaignRole> {
        self.members.get(&user).copied()
    }

    /// Returns true if the user is a member.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains_key(&user)
    }

    /// Returns true if the user is a game master.
    #[must_use]
    pub fn is_game_master(&self, user: UserId) -> bool {
        self.role_of(user) == Some(CampaignRole::GameMaster)
    }

    /// The registered characters.
    #[must_use]
    pub fn characters(&self) -> &BTreeMap<CharacterId, Character> {
        &self.characters
    }

    /// Looks up a character.
    #[must_use]
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// The override layer for a record, if one is set.
    #[must_use]
    pub fn override_for(&self, record: RecordId) -> Option<&CampaignOverride> {
        self.overrides.get(&record)
    }

    /// The importance tag for a record, if one is set.
    #[must_use]
    pub fn importance_of(&self, record: RecordId) -> Option<Importance> {
        self.overrides.get(&record).and_then(|o| o.importance)
    }
}

/// Stores campaigns and issues campaign/character ids.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CampaignStore {
    campaigns: BTreeMap<CampaignId, Campaign>,
    next_campaign: u64,
    next_character: u64,
}

impl CampaignStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a campaign; the creator becomes its game master.
    pub fn create(&mut self, name: impl Into<String>, creator: UserId) -> CampaignId {
        let id = CampaignId::new(self.next_campaign);
        self.next_campaign += 1;

        let mut members = BTreeMap::new();
        members.insert(creator, CampaignRole::GameMaster);

        self.campaigns.insert(
            id,
            Campaign {
                id,
                name: name.into(),
                description: None,
                members,
                characters: BTreeMap::new(),
                overrides: HashMap::new(),
            },
        );
        id
    }

    /// Looks up a campaign.
    #[must_use]
    pub fn get(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.get(&id)
    }

    /// Looks up a campaign, erroring when absent.
    ///
    /// # Errors
    ///
    /// Returns a campaign-not-found error.
    pub fn require(&self, id: CampaignId) -> Result<&Campaign> {
        self.get(id)
            .ok_or_else(|| Error::new(ErrorKind::CampaignNotFound(id)))
    }

    /// Iterates all campaigns in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.values()
    }

    /// Adds a member with the given role, or updates their role.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist.
    pub fn add_member(&mut self, id: CampaignId, user: UserId, role: CampaignRole) -> Result<()> {
        let campaign = self.require_mut(id)?;
        campaign.members.insert(user, role);
        Ok(())
    }

    /// Removes a member and the characters they play.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist.
    pub fn remove_member(&mut self, id: CampaignId, user: UserId) -> Result<()> {
        let campaign = self.require_mut(id)?;
        campaign.members.remove(&user);
        campaign.characters.retain(|_, c| c.owner != user);
        Ok(())
    }

    /// Registers a character for a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist or the owner is not
    /// a member.
    pub fn create_character(
        &mut self,
        id: CampaignId,
        owner: UserId,
        name: impl Into<String>,
    ) -> Result<CharacterId> {
        if !self.require(id)?.is_member(owner) {
            return Err(Error::new(ErrorKind::NotAMember {
                campaign: id,
                user: owner,
            }));
        }

        let character = CharacterId::new(self.next_character);
        self.next_character += 1;
        let campaign = self.require_mut(id)?;
        campaign.characters.insert(
            character,
            Character {
                id: character,
                name: name.into(),
                owner,
            },
        );
        Ok(character)
    }

    /// Removes a character.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign or character does not exist.
    pub fn remove_character(&mut self, id: CampaignId, character: CharacterId) -> Result<()> {
        let campaign = self.require_mut(id)?;
        if campaign.characters.remove(&character).is_none() {
            return Err(Error::new(ErrorKind::CharacterNotFound(character)));
        }
        Ok(())
    }

    /// Sets (replaces) the override layer for a record in a campaign.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist.
    pub fn set_override(
        &mut self,
        id: CampaignId,
        record: RecordId,
        layer: CampaignOverride,
    ) -> Result<()> {
        let campaign = self.require_mut(id)?;
        campaign.overrides.insert(record, layer);
        Ok(())
    }

    /// Clears the override layer for a record in a campaign.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist.
    pub fn clear_override(&mut self, id: CampaignId, record: RecordId) -> Result<()> {
        let campaign = self.require_mut(id)?;
        campaign.overrides.remove(&record);
        Ok(())
    }

    /// Drops overrides for a destroyed record across all campaigns.
    pub fn on_record_destroyed(&mut self, record: RecordId) {
        for campaign in self.campaigns.values_mut() {
            campaign.overrides.remove(&record);
        }
    }

    fn require_mut(&mut self, id: CampaignId) -> Result<&mut Campaign> {
        self.campaigns
            .get_mut(&id)
            .ok_or_else(|| Error::new(ErrorKind::CampaignNotFound(id)))
    }
}
