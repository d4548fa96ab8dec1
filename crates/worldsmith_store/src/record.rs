//! Record instances and their generational slot store.
//!
//! The `RecordStore` allocates record slots from a free list and tracks
//! generations so references held in payloads can be detected as stale
//! after the record is destroyed and its slot reused.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_access::{AccessPolicy, Visibility};
use worldsmith_foundation::{Error, RecordClass, RecordId, Result, TypeId, UserId, Value};
use worldsmith_registry::Payload;

/// A stored entity or location instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    /// Generational identifier.
    pub id: RecordId,
    /// Record family.
    pub class: RecordClass,
    /// The type this record conforms to.
    pub type_id: TypeId,
    /// Display name.
    pub name: String,
    /// The user who created the record.
    pub owner: UserId,
    /// Default exposure.
    pub visibility: Visibility,
    /// Fine-grained read/write permission.
    pub policy: AccessPolicy,
    /// The schema-less field payload, validated at write time.
    pub fields: Payload,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to create a record, minus the id and timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDraft {
    /// Record family.
    pub class: RecordClass,
    /// The type the record conforms to.
    pub type_id: TypeId,
    /// Display name.
    pub name: String,
    /// The creating user.
    pub owner: UserId,
    /// Default exposure.
    pub visibility: Visibility,
    /// Read/write permission.
    pub policy: AccessPolicy,
    /// Initial field payload.
    pub fields: Payload,
}

impl RecordDraft {
    /// Creates a draft with default visibility (visible) and policy
    /// (global read, owner-only write).
    #[must_use]
    pub fn new(
        class: RecordClass,
        type_id: TypeId,
        name: impl Into<String>,
        owner: UserId,
    ) -> Self {
        Self {
            class,
            type_id,
            name: name.into(),
            owner,
            visibility: Visibility::default(),
            policy: AccessPolicy::default(),
            fields: Payload::new(),
        }
    }

    /// Shorthand for an entity draft.
    #[must_use]
    pub fn entity(type_id: TypeId, name: impl Into<String>, owner: UserId) -> Self {
        Self::new(RecordClass::Entity, type_id, name, owner)
    }

    /// Shorthand for a location draft.
    #[must_use]
    pub fn location(type_id: TypeId, name: impl Into<String>, owner: UserId) -> Self {
        Self::new(RecordClass::Location, type_id, name, owner)
    }

    /// Sets the default exposure.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets the access policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets one payload field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Replaces the whole payload.
    #[must_use]
    pub fn with_fields(mut self, fields: Payload) -> Self {
        self.fields = fields;
        self
    }
}

/// One allocation slot. Even generations are free, odd generations hold a
/// live record.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Slot {
    generation: u32,
    record: Option<Record>,
}

/// Stores records with generational slot allocation.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordStore {
    slots: Vec<Slot>,
    free_list: Vec<u64>,
    live_count: usize,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record built from the draft, returning its id.
    ///
    /// Reuses slots from the free list when available. Validation is the
    /// caller's business; the store only allocates.
    pub fn insert(&mut self, draft: RecordDraft, now: DateTime<Utc>) -> RecordId {
        self.live_count += 1;

        let (index, generation) = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            (index, slot.generation)
        } else {
            let index = self.slots.len() as u64;
            self.slots.push(Slot {
                generation: 1,
                record: None,
            });
            (index, 1)
        };

        let id = RecordId::new(index, generation);
        self.slots[index as usize].record = Some(Record {
            id,
            class: draft.class,
            type_id: draft.type_id,
            name: draft.name,
            owner: draft.owner,
            visibility: draft.visibility,
            policy: draft.policy,
            fields: draft.fields,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Gets a live record by id. Stale ids resolve to `None`.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation == id.generation {
            slot.record.as_ref()
        } else {
            None
        }
    }

    /// Gets a live record mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation == id.generation {
            slot.record.as_mut()
        } else {
            None
        }
    }

    /// Destroys a record, returning it and freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the record never existed or the id is stale.
    pub fn destroy(&mut self, id: RecordId) -> Result<Record> {
        self.validate(id)?;

        let slot = &mut self.slots[id.index as usize];
        slot.generation += 1;
        self.free_list.push(id.index);
        self.live_count -= 1;

        slot.record
            .take()
            .ok_or_else(|| Error::internal(format!("live slot without record: {id:?}")))
    }

    /// Checks whether the id resolves to a live record.
    #[must_use]
    pub fn exists(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Validates that the id resolves to a live record.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for never-allocated or freed slots and a
    /// stale-record error for generation mismatches.
    pub fn validate(&self, id: RecordId) -> Result<()> {
        let Some(slot) = self.slots.get(id.index as usize) else {
            return Err(Error::record_not_found(id));
        };
        if slot.generation != id.generation {
            return Err(Error::stale_record(id));
        }
        if slot.generation % 2 == 0 {
            return Err(Error::record_not_found(id));
        }
        Ok(())
    }

    /// Iterates all live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.slots.iter().filter_map(|slot| slot.record.as_ref())
    }

    /// Iterates live records of one class in slot order.
    pub fn iter_class(&self, class: RecordClass) -> impl Iterator<Item = &Record> {
        self.iter().filter(move |r| r.class == class)
    }

    /// The number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }
}
