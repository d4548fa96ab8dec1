//! Notes attached to records, with audience-based sharing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::{CampaignId, Error, ErrorKind, NoteId, RecordId, Result, UserId};

/// Who, besides the author, may read a note.
///
/// Audience filtering composes with record exposure: a reader must be able
/// to read the record at all before the audience is consulted.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NoteAudience {
    /// Only the author.
    Private,
    /// The author plus the listed users.
    Users(BTreeSet<UserId>),
    /// The author plus current members of the campaign.
    Campaign(CampaignId),
    /// Anyone who can read the record.
    Everyone,
}

/// A note exchanged between users about a record.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Note {
    /// Identifier, issued by the note store.
    pub id: NoteId,
    /// The record the note is attached to.
    pub record: RecordId,
    /// The writing user.
    pub author: UserId,
    /// Note text.
    pub body: String,
    /// Sharing audience.
    pub audience: NoteAudience,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Stores notes with a per-record index.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoteStore {
    notes: BTreeMap<NoteId, Note>,
    by_record: HashMap<RecordId, Vec<NoteId>>,
    next_id: u64,
}

impl NoteStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a note.
    pub fn create(
        &mut self,
        record: RecordId,
        author: UserId,
        body: impl Into<String>,
        audience: NoteAudience,
        now: DateTime<Utc>,
    ) -> NoteId {
        let id = NoteId::new(self.next_id);
        self.next_id += 1;

        self.notes.insert(
            id,
            Note {
                id,
                record,
                author,
                body: body.into(),
                audience,
                created_at: now,
            },
        );
        self.by_record.entry(record).or_default().push(id);
        id
    }

    /// Looks up a note.
    #[must_use]
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    /// Looks up a note, erroring when absent.
    ///
    /// # Errors
    ///
    /// Returns a note-not-found error.
    pub fn require(&self, id: NoteId) -> Result<&Note> {
        self.get(id)
            .ok_or_else(|| Error::new(ErrorKind::NoteNotFound(id)))
    }

    /// Replaces a note's body.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist.
    pub fn edit_body(&mut self, id: NoteId, body: impl Into<String>) -> Result<()> {
        let note = self
            .notes
            .get_mut(&id)
            .ok_or_else(|| Error::new(ErrorKind::NoteNotFound(id)))?;
        note.body = body.into();
        Ok(())
    }

    /// Deletes a note, returning it.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist.
    pub fn delete(&mut self, id: NoteId) -> Result<Note> {
        let note = self
            .notes
            .remove(&id)
            .ok_or_else(|| Error::new(ErrorKind::NoteNotFound(id)))?;
        if let Some(ids) = self.by_record.get_mut(&note.record) {
            ids.retain(|n| *n != id);
        }
        Ok(note)
    }

    /// The notes on a record, oldest first.
    #[must_use]
    pub fn notes_for_record(&self, record: RecordId) -> Vec<&Note> {
        self.by_record
            .get(&record)
            .into_iter()
            .flatten()
            .filter_map(|id| self.notes.get(id))
            .collect()
    }

    /// Drops all notes attached to a destroyed record.
    pub fn on_record_destroyed(&mut self, record: RecordId) {
        if let Some(ids) = self.by_record.remove(&record) {
            for id in ids {
                self.notes.remove(&id);
            }
        }
    }
}
