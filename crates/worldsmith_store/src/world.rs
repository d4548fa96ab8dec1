//! The world facade.
//!
//! The `World` owns the registries and stores and is the only surface the
//! application layers talk to. Writes validate payloads and enforce write
//! access; every read path filters through the access evaluator, so a
//! record a viewer may not see behaves exactly as if it did not exist.

use chrono::Utc;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_access::{
    AccessPolicy, CampaignOverride, Exposure, Importance, Viewer, Visibility, can_write,
    read_exposure_with_override,
};
use worldsmith_foundation::{
    CampaignId, CharacterId, Error, ErrorKind, NoteId, NotificationId, RecordClass, RecordId,
    Result, TypeId, UserId,
};
use worldsmith_registry::{
    FieldDef, FieldRule, Payload, RelationshipRegistry, RelationshipType, TypeDef, TypeRegistry,
};

use crate::campaign::{Campaign, CampaignRole, CampaignStore};
use crate::link::LinkStore;
use crate::note::{Note, NoteAudience, NoteStore};
use crate::notify::{Notification, NotificationKind, NotificationStore};
use crate::record::{Record, RecordDraft, RecordStore};

/// An access-filtered read of one record.
///
/// `fields` carries only what the exposure admits: every rule-displayed
/// field under `Full`, only the visible-flagged ones under `Partial`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordView {
    /// The record.
    pub id: RecordId,
    /// Record family.
    pub class: RecordClass,
    /// The record's type.
    pub type_id: TypeId,
    /// Display name.
    pub name: String,
    /// The exposure this view was built under.
    pub exposure: Exposure,
    /// The admitted field values.
    pub fields: Payload,
}

/// The unified interface to all registries and stores.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct World {
    /// Entity and location type definitions.
    registry: TypeRegistry,
    /// Relationship type definitions.
    relationships: RelationshipRegistry,
    /// Record instances.
    records: RecordStore,
    /// Typed link edges.
    links: LinkStore,
    /// Campaigns, members, characters, overrides.
    campaigns: CampaignStore,
    /// Notes on records.
    notes: NoteStore,
    /// Per-user notification queues.
    notifications: NotificationStore,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Types and relationships
    // =========================================================================

    /// The type registry.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The relationship type registry.
    #[must_use]
    pub fn relationships(&self) -> &RelationshipRegistry {
        &self.relationships
    }

    /// Registers an entity type.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is not an entity type or fails
    /// registry validation.
    pub fn register_entity_type(&mut self, def: TypeDef) -> Result<TypeId> {
        self.register_class_type(RecordClass::Entity, def)
    }

    /// Registers a location type.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is not a location type or fails
    /// registry validation.
    pub fn register_location_type(&mut self, def: TypeDef) -> Result<TypeId> {
        self.register_class_type(RecordClass::Location, def)
    }

    fn register_class_type(&mut self, class: RecordClass, def: TypeDef) -> Result<TypeId> {
        if def.class != class {
            return Err(Error::new(ErrorKind::ClassMismatch {
                expected: class,
                actual: def.class,
            })
            .with_operation("register type"));
        }
        let id = self.registry.register(def)?;
        debug!(type_id = %id, %class, "type registered");
        Ok(id)
    }

    /// Adds a field to a registered type.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::add_field`].
    pub fn add_field(&mut self, type_id: TypeId, field: FieldDef) -> Result<()> {
        self.registry.add_field(type_id, field)
    }

    /// Removes a field from a registered type.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::remove_field`].
    pub fn remove_field(&mut self, type_id: TypeId, key: &str) -> Result<()> {
        self.registry.remove_field(type_id, key)
    }

    /// Adds a display rule to a registered type.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::add_rule`].
    pub fn add_rule(&mut self, type_id: TypeId, rule: FieldRule) -> Result<()> {
        self.registry.add_rule(type_id, rule)
    }

    /// Defines a relationship type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is already defined.
    pub fn define_relationship(&mut self, rel: RelationshipType) -> Result<()> {
        self.relationships.define(rel)
    }

    /// The relationship types a link editor offers for a pair of entity
    /// types.
    #[must_use]
    pub fn relationships_between(&self, from: TypeId, to: TypeId) -> Vec<&RelationshipType> {
        self.relationships.valid_between(from, to)
    }

    // =========================================================================
    // Viewer resolution
    // =========================================================================

    /// Builds the viewer context for a request.
    ///
    /// A selected campaign must exist and the user must be a member; the
    /// game-master flag is resolved from their role. An active character
    /// must belong to the campaign and, unless the user is its game
    /// master, be played by the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign or character does not resolve or
    /// the user is not a member.
    pub fn viewer(
        &self,
        user: UserId,
        campaign: Option<CampaignId>,
        character: Option<CharacterId>,
    ) -> Result<Viewer> {
        let mut viewer = Viewer::new(user);

        let Some(campaign_id) = campaign else {
            if let Some(character_id) = character {
                return Err(Error::new(ErrorKind::CharacterNotFound(character_id))
                    .with_operation("viewer without campaign"));
            }
            return Ok(viewer);
        };

        let campaign = self.campaigns.require(campaign_id)?;
        let Some(role) = campaign.role_of(user) else {
            return Err(Error::new(ErrorKind::NotAMember {
                campaign: campaign_id,
                user,
            }));
        };

        viewer = viewer.in_campaign(campaign_id);
        if role == CampaignRole::GameMaster {
            viewer = viewer.game_master();
        }

        if let Some(character_id) = character {
            let ch = campaign
                .character(character_id)
                .ok_or_else(|| Error::new(ErrorKind::CharacterNotFound(character_id)))?;
            if ch.owner != user && role != CampaignRole::GameMaster {
                return Err(Error::new(ErrorKind::NotAMember {
                    campaign: campaign_id,
                    user,
                }));
            }
            viewer = viewer.as_character(character_id);
        }

        Ok(viewer)
    }

    // =========================================================================
    // Record lifecycle
    // =========================================================================

    /// Creates a record after validating its payload and references.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is unknown or of the wrong class, the
    /// payload fails validation, or a reference points at a dead record or
    /// one of the wrong type.
    pub fn create_record(&mut self, draft: RecordDraft) -> Result<RecordId> {
        let type_def = self.registry.require(draft.type_id)?;
        if type_def.class != draft.class {
            return Err(Error::new(ErrorKind::ClassMismatch {
                expected: type_def.class,
                actual: draft.class,
            })
            .with_operation("create_record"));
        }
        type_def.validate(&draft.fields)?;
        self.check_references(draft.type_id, &draft.fields)?;

        let owner = draft.owner;
        let id = self.records.insert(draft, Utc::now());
        debug!(record = %id, user = %owner, "record created");
        Ok(id)
    }

    /// Replaces a record's payload.
    ///
    /// The whole payload is validated and swapped; partial merges are the
    /// caller's business. The owner is notified when somebody else edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is dead, the viewer lacks write
    /// access, or the payload fails validation.
    pub fn update_fields(&mut self, viewer: &Viewer, id: RecordId, fields: Payload) -> Result<()> {
        self.records.validate(id)?;
        let record = self
            .records
            .get(id)
            .ok_or_else(|| Error::record_not_found(id))?;

        if !can_write(record.owner, &record.policy, viewer) {
            warn!(user = %viewer.user, record = %id, "write denied");
            return Err(Error::access_denied(viewer.user, id).with_operation("update_fields"));
        }

        let type_id = record.type_id;
        let owner = record.owner;
        let name = record.name.clone();

        self.registry.validate_payload(type_id, &fields)?;
        self.check_references(type_id, &fields)?;

        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        record.fields = fields;
        record.updated_at = Utc::now();

        if viewer.user != owner {
            self.notifications.push(
                owner,
                NotificationKind::RecordChanged { record: id },
                format!("{name} was updated"),
                Utc::now(),
            );
        }
        debug!(record = %id, user = %viewer.user, "record updated");
        Ok(())
    }

    /// Renames a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is dead or the viewer lacks write
    /// access.
    pub fn rename(&mut self, viewer: &Viewer, id: RecordId, name: impl Into<String>) -> Result<()> {
        self.records.validate(id)?;
        let record = self
            .records
            .get(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        if !can_write(record.owner, &record.policy, viewer) {
            warn!(user = %viewer.user, record = %id, "rename denied");
            return Err(Error::access_denied(viewer.user, id).with_operation("rename"));
        }

        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        record.name = name.into();
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Sets a record's default visibility. Owner or game master only.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is dead or the viewer is neither.
    pub fn set_visibility(
        &mut self,
        viewer: &Viewer,
        id: RecordId,
        visibility: Visibility,
    ) -> Result<()> {
        self.require_owner_or_gm(viewer, id)?;
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        record.visibility = visibility;
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces a record's access policy. Owner or game master only.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is dead or the viewer is neither.
    pub fn set_policy(
        &mut self,
        viewer: &Viewer,
        id: RecordId,
        policy: AccessPolicy,
    ) -> Result<()> {
        self.require_owner_or_gm(viewer, id)?;
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        record.policy = policy;
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Destroys a record, dropping its edges, notes, and campaign
    /// overrides. Owner or game master only.
    ///
    /// References held in other payloads are left in place; their
    /// generational ids stop resolving, which is how staleness is
    /// detected.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is dead or the viewer is neither
    /// owner nor game master.
    pub fn destroy_record(&mut self, viewer: &Viewer, id: RecordId) -> Result<Record> {
        self.require_owner_or_gm(viewer, id)?;

        self.links.on_record_destroyed(id);
        self.notes.on_record_destroyed(id);
        self.campaigns.on_record_destroyed(id);
        let record = self.records.destroy(id)?;

        debug!(record = %id, user = %viewer.user, "record destroyed");
        Ok(record)
    }

    fn require_owner_or_gm(&self, viewer: &Viewer, id: RecordId) -> Result<()> {
        self.records.validate(id)?;
        let record = self
            .records
            .get(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        if viewer.user == record.owner || viewer.game_master {
            Ok(())
        } else {
            warn!(user = %viewer.user, record = %id, "owner-only operation denied");
            Err(Error::access_denied(viewer.user, id))
        }
    }

    fn check_references(&self, type_id: TypeId, fields: &Payload) -> Result<()> {
        let type_def = self.registry.require(type_id)?;
        for (key, value) in fields {
            let Some((ref_class, target_id)) = value.as_record_ref() else {
                continue;
            };
            self.records
                .validate(target_id)
                .map_err(|e| e.with_operation("reference check"))?;
            let target = self
                .records
                .get(target_id)
                .ok_or_else(|| Error::record_not_found(target_id))?;
            if target.class != ref_class {
                return Err(Error::new(ErrorKind::ClassMismatch {
                    expected: ref_class,
                    actual: target.class,
                })
                .with_operation("reference check"));
            }
            if let Some(expected) = type_def.field(key).and_then(|f| f.reference_target) {
                if target.type_id != expected {
                    return Err(Error::new(ErrorKind::ReferenceTargetMismatch {
                        field: key.clone(),
                        expected,
                        actual: target.type_id,
                    }));
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Linking
    // =========================================================================

    /// Links two entity records with a typed edge.
    ///
    /// Both records must be live entities, the relationship matcher must
    /// allow their types, and the viewer needs write access to the source
    /// record. Linking an existing edge is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error on any of the above failing.
    pub fn link(
        &mut self,
        viewer: &Viewer,
        relationship: &str,
        from: RecordId,
        to: RecordId,
    ) -> Result<()> {
        self.records.validate(from).map_err(|e| e.with_operation("link"))?;
        self.records.validate(to).map_err(|e| e.with_operation("link"))?;

        let from_rec = self
            .records
            .get(from)
            .ok_or_else(|| Error::record_not_found(from))?;
        let to_rec = self
            .records
            .get(to)
            .ok_or_else(|| Error::record_not_found(to))?;

        for rec in [from_rec, to_rec] {
            if rec.class != RecordClass::Entity {
                return Err(Error::new(ErrorKind::ClassMismatch {
                    expected: RecordClass::Entity,
                    actual: rec.class,
                })
                .with_operation("link"));
            }
        }

        let rel = self.relationships.require(relationship)?;
        if !rel.allows(from_rec.type_id, to_rec.type_id) {
            warn!(%relationship, %from, %to, "link rejected by endpoint constraints");
            return Err(Error::new(ErrorKind::EndpointRejected {
                relationship: relationship.to_string(),
                from: from_rec.type_id,
                to: to_rec.type_id,
            }));
        }

        if !can_write(from_rec.owner, &from_rec.policy, viewer) {
            warn!(user = %viewer.user, record = %from, "link denied");
            return Err(Error::access_denied(viewer.user, from).with_operation("link"));
        }

        self.links.link(from, relationship, to);
        debug!(%relationship, %from, %to, "records linked");
        Ok(())
    }

    /// Removes a typed edge. Unlinking a non-existent edge is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the source record is dead or the viewer lacks
    /// write access to it.
    pub fn unlink(
        &mut self,
        viewer: &Viewer,
        relationship: &str,
        from: RecordId,
        to: RecordId,
    ) -> Result<()> {
        self.records.validate(from).map_err(|e| e.with_operation("unlink"))?;
        let from_rec = self
            .records
            .get(from)
            .ok_or_else(|| Error::record_not_found(from))?;
        if !can_write(from_rec.owner, &from_rec.policy, viewer) {
            warn!(user = %viewer.user, record = %from, "unlink denied");
            return Err(Error::access_denied(viewer.user, from).with_operation("unlink"));
        }

        self.links.unlink(from, relationship, to);
        Ok(())
    }

    // =========================================================================
    // Filtered reads
    // =========================================================================

    /// The viewer's exposure for a record. Dead records expose nothing.
    #[must_use]
    pub fn exposure(&self, viewer: &Viewer, id: RecordId) -> Exposure {
        match self.records.get(id) {
            Some(record) => self.exposure_of(viewer, record),
            None => Exposure::None,
        }
    }

    /// Reads a record through the access filter.
    ///
    /// Returns `None` for dead records and for records the viewer may not
    /// see; the two are indistinguishable on purpose.
    #[must_use]
    pub fn view(&self, viewer: &Viewer, id: RecordId) -> Option<RecordView> {
        self.records.get(id).and_then(|r| self.view_of(viewer, r))
    }

    /// Every record the viewer can read, in storage order.
    #[must_use]
    pub fn visible_records(&self, viewer: &Viewer) -> Vec<RecordView> {
        self.records
            .iter()
            .filter_map(|r| self.view_of(viewer, r))
            .collect()
    }

    /// The records of one class the viewer can read, in storage order.
    #[must_use]
    pub fn visible_records_of_class(&self, viewer: &Viewer, class: RecordClass) -> Vec<RecordView> {
        self.records
            .iter_class(class)
            .filter_map(|r| self.view_of(viewer, r))
            .collect()
    }

    /// Resolves a reference held in a payload.
    ///
    /// Dead and stale targets report as errors so owner tooling can flag
    /// them; an intact target the viewer may not see resolves to
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the not-found or stale error for the target.
    pub fn resolve_reference(&self, viewer: &Viewer, id: RecordId) -> Result<Option<RecordView>> {
        self.records.validate(id)?;
        Ok(self.view(viewer, id))
    }

    /// Outgoing edges of a record, with the other end access-filtered.
    ///
    /// Edges to records the viewer cannot see are dropped, as is
    /// everything when the record itself is unreadable.
    #[must_use]
    pub fn links_from(&self, viewer: &Viewer, id: RecordId) -> Vec<(String, RecordView)> {
        self.filtered_links(viewer, id, true)
    }

    /// Incoming edges of a record, with the other end access-filtered.
    #[must_use]
    pub fn links_to(&self, viewer: &Viewer, id: RecordId) -> Vec<(String, RecordView)> {
        self.filtered_links(viewer, id, false)
    }

    fn filtered_links(
        &self,
        viewer: &Viewer,
        id: RecordId,
        forward: bool,
    ) -> Vec<(String, RecordView)> {
        if !self.exposure(viewer, id).is_readable() {
            return Vec::new();
        }
        let mut out: Vec<(String, RecordView)> = self
            .links
            .edges_for(id)
            .into_iter()
            .filter(|(_, _, dir)| *dir == forward)
            .filter_map(|(rel, other, _)| Some((rel, self.view(viewer, other)?)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));
        out
    }

    /// The readable records of a campaign's world, grouped by importance:
    /// critical first, then important, medium, and untagged, each group
    /// sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist.
    pub fn campaign_records_by_importance(
        &self,
        viewer: &Viewer,
        campaign: CampaignId,
    ) -> Result<Vec<(Option<Importance>, RecordView)>> {
        let campaign = self.campaigns.require(campaign)?;

        let mut out: Vec<(Option<Importance>, RecordView)> = self
            .records
            .iter()
            .filter_map(|record| {
                let view = self.view_of(viewer, record)?;
                Some((campaign.importance_of(record.id), view))
            })
            .collect();

        fn rank(importance: Option<Importance>) -> u8 {
            match importance {
                Some(Importance::Critical) => 0,
                Some(Importance::Important) => 1,
                Some(Importance::Medium) => 2,
                None => 3,
            }
        }
        out.sort_by(|a, b| rank(a.0).cmp(&rank(b.0)).then_with(|| a.1.name.cmp(&b.1.name)));
        Ok(out)
    }

    fn campaign_override_for(
        &self,
        viewer: &Viewer,
        record: RecordId,
    ) -> Option<&CampaignOverride> {
        let campaign = viewer.campaign?;
        self.campaigns.get(campaign)?.override_for(record)
    }

    fn exposure_of(&self, viewer: &Viewer, record: &Record) -> Exposure {
        let layer = self.campaign_override_for(viewer, record.id);
        read_exposure_with_override(record.owner, record.visibility, &record.policy, layer, viewer)
    }

    fn view_of(&self, viewer: &Viewer, record: &Record) -> Option<RecordView> {
        let exposure = self.exposure_of(viewer, record);
        if !exposure.is_readable() {
            return None;
        }

        let type_def = self.registry.get(record.type_id)?;
        let fields = type_def
            .effective_fields(&record.fields)
            .into_iter()
            .filter(|f| exposure == Exposure::Full || f.visible)
            .filter_map(|f| {
                record
                    .fields
                    .get(&f.key)
                    .map(|v| (f.key.clone(), v.clone()))
            })
            .collect();

        Some(RecordView {
            id: record.id,
            class: record.class,
            type_id: record.type_id,
            name: record.name.clone(),
            exposure,
            fields,
        })
    }

    // =========================================================================
    // Campaigns
    // =========================================================================

    /// Creates a campaign; the creator becomes its game master.
    pub fn create_campaign(&mut self, name: impl Into<String>, creator: UserId) -> CampaignId {
        let id = self.campaigns.create(name, creator);
        debug!(campaign = %id, user = %creator, "campaign created");
        id
    }

    /// Looks up a campaign.
    #[must_use]
    pub fn campaign(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.get(id)
    }

    /// Invites a user into a campaign. Game master only. The invitee gets
    /// a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist or `by` is not its
    /// game master.
    pub fn invite(
        &mut self,
        by: UserId,
        campaign: CampaignId,
        user: UserId,
        role: CampaignRole,
    ) -> Result<()> {
        let c = self.campaigns.require(campaign)?;
        if !c.is_game_master(by) {
            return Err(Error::new(ErrorKind::NotGameMaster { campaign, user: by }));
        }
        let name = c.name.clone();

        self.campaigns.add_member(campaign, user, role)?;
        self.notifications.push(
            user,
            NotificationKind::CampaignInvite { campaign },
            format!("You were invited to {name}"),
            Utc::now(),
        );
        debug!(campaign = %campaign, user = %user, "member invited");
        Ok(())
    }

    /// Removes a member from a campaign. Game master only.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist or `by` is not its
    /// game master.
    pub fn remove_member(&mut self, by: UserId, campaign: CampaignId, user: UserId) -> Result<()> {
        if !self.campaigns.require(campaign)?.is_game_master(by) {
            return Err(Error::new(ErrorKind::NotGameMaster { campaign, user: by }));
        }
        self.campaigns.remove_member(campaign, user)
    }

    /// Registers a character for a campaign member.
    ///
    /// # Errors
    ///
    /// See [`CampaignStore::create_character`].
    pub fn create_character(
        &mut self,
        campaign: CampaignId,
        owner: UserId,
        name: impl Into<String>,
    ) -> Result<CharacterId> {
        self.campaigns.create_character(campaign, owner, name)
    }

    /// Sets a campaign's override layer for a record. Game master only.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign or record does not resolve or
    /// `by` is not the game master.
    pub fn set_campaign_override(
        &mut self,
        by: UserId,
        campaign: CampaignId,
        record: RecordId,
        layer: CampaignOverride,
    ) -> Result<()> {
        if !self.campaigns.require(campaign)?.is_game_master(by) {
            return Err(Error::new(ErrorKind::NotGameMaster { campaign, user: by }));
        }
        self.records.validate(record)?;
        self.campaigns.set_override(campaign, record, layer)
    }

    /// Clears a campaign's override layer for a record. Game master only.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign does not exist or `by` is not the
    /// game master.
    pub fn clear_campaign_override(
        &mut self,
        by: UserId,
        campaign: CampaignId,
        record: RecordId,
    ) -> Result<()> {
        if !self.campaigns.require(campaign)?.is_game_master(by) {
            return Err(Error::new(ErrorKind::NotGameMaster { campaign, user: by }));
        }
        self.campaigns.clear_override(campaign, record)
    }

    // =========================================================================
    // Notes
    // =========================================================================

    /// Attaches a note to a record the viewer can read.
    ///
    /// Users named in a [`NoteAudience::Users`] audience are notified.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is dead or unreadable to the viewer.
    pub fn add_note(
        &mut self,
        viewer: &Viewer,
        record: RecordId,
        body: impl Into<String>,
        audience: NoteAudience,
    ) -> Result<NoteId> {
        self.records.validate(record)?;
        if !self.exposure(viewer, record).is_readable() {
            warn!(user = %viewer.user, record = %record, "note on unreadable record denied");
            return Err(Error::access_denied(viewer.user, record).with_operation("add_note"));
        }

        let record_name = self
            .records
            .get(record)
            .map(|r| r.name.clone())
            .unwrap_or_default();

        let id = self
            .notes
            .create(record, viewer.user, body, audience.clone(), Utc::now());

        if let NoteAudience::Users(users) = &audience {
            for user in users {
                if *user != viewer.user {
                    self.notifications.push(
                        *user,
                        NotificationKind::NoteShared { note: id, record },
                        format!("A note on {record_name} was shared with you"),
                        Utc::now(),
                    );
                }
            }
        }
        debug!(note = %id, record = %record, user = %viewer.user, "note added");
        Ok(id)
    }

    /// The notes on a record the viewer may read, oldest first.
    ///
    /// Audience filtering composes with record exposure: an unreadable
    /// record yields no notes at all.
    #[must_use]
    pub fn notes_on(&self, viewer: &Viewer, record: RecordId) -> Vec<&Note> {
        if !self.exposure(viewer, record).is_readable() {
            return Vec::new();
        }
        self.notes
            .notes_for_record(record)
            .into_iter()
            .filter(|note| self.note_readable(viewer, note))
            .collect()
    }

    /// Replaces a note's body. Author only.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or `user` did not
    /// write it.
    pub fn edit_note(&mut self, user: UserId, note: NoteId, body: impl Into<String>) -> Result<()> {
        let existing = self.notes.require(note)?;
        if existing.author != user {
            return Err(Error::access_denied(user, existing.record).with_operation("edit_note"));
        }
        self.notes.edit_body(note, body)
    }

    /// Deletes a note. Author only.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or `user` did not
    /// write it.
    pub fn delete_note(&mut self, user: UserId, note: NoteId) -> Result<Note> {
        let existing = self.notes.require(note)?;
        if existing.author != user {
            return Err(Error::access_denied(user, existing.record).with_operation("delete_note"));
        }
        self.notes.delete(note)
    }

    fn note_readable(&self, viewer: &Viewer, note: &Note) -> bool {
        if note.author == viewer.user {
            return true;
        }
        match &note.audience {
            NoteAudience::Private => false,
            NoteAudience::Everyone => true,
            NoteAudience::Users(users) => users.contains(&viewer.user),
            NoteAudience::Campaign(campaign) => self
                .campaigns
                .get(*campaign)
                .is_some_and(|c| c.is_member(viewer.user)),
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// A user's notifications, oldest first.
    #[must_use]
    pub fn notifications_for(&self, user: UserId) -> &[Notification] {
        self.notifications.for_user(user)
    }

    /// How many of a user's notifications are unread.
    #[must_use]
    pub fn unread_count(&self, user: UserId) -> usize {
        self.notifications.unread_count(user)
    }

    /// Marks one notification read. Idempotent.
    pub fn mark_read(&mut self, user: UserId, id: NotificationId) -> bool {
        self.notifications.mark_read(user, id)
    }

    /// Marks all of a user's notifications read.
    pub fn mark_all_read(&mut self, user: UserId) {
        self.notifications.mark_all_read(user);
    }
}
