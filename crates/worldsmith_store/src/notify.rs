//! Per-user notification queues.
//!
//! The store holds and filters notifications; delivery transport (email,
//! websockets) is an out-of-scope collaborator that drains these queues.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::{CampaignId, NoteId, NotificationId, RecordId, UserId};

/// What a notification is about.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NotificationKind {
    /// A note was shared with the recipient.
    NoteShared {
        /// The shared note.
        note: NoteId,
        /// The record it is attached to.
        record: RecordId,
    },
    /// The recipient was invited into a campaign.
    CampaignInvite {
        /// The campaign.
        campaign: CampaignId,
    },
    /// A record the recipient owns was changed by someone else.
    RecordChanged {
        /// The changed record.
        record: RecordId,
    },
}

/// A queued notification.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Notification {
    /// Identifier, issued by the notification store.
    pub id: NotificationId,
    /// The user this notification is for.
    pub recipient: UserId,
    /// What happened.
    pub kind: NotificationKind,
    /// Human-readable summary.
    pub message: String,
    /// When it was queued.
    pub created_at: DateTime<Utc>,
    /// Whether the recipient has seen it.
    pub read: bool,
}

/// Per-user notification queues.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NotificationStore {
    queues: BTreeMap<UserId, Vec<Notification>>,
    next_id: u64,
}

impl NotificationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a notification for a user.
    pub fn push(
        &mut self,
        recipient: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> NotificationId {
        let id = NotificationId::new(self.next_id);
        self.next_id += 1;

        self.queues.entry(recipient).or_default().push(Notification {
            id,
            recipient,
            kind,
            message: message.into(),
            created_at: now,
            read: false,
        });
        id
    }

    /// The user's notifications, oldest first.
    #[must_use]
    pub fn for_user(&self, user: UserId) -> &[Notification] {
        self.queues.get(&user).map_or(&[], Vec::as_slice)
    }

    /// How many of the user's notifications are unread.
    #[must_use]
    pub fn unread_count(&self, user: UserId) -> usize {
        self.for_user(user).iter().filter(|n| !n.read).count()
    }

    /// Marks one notification read. Idempotent; returns whether the
    /// notification exists for that user.
    pub fn mark_read(&mut self, user: UserId, id: NotificationId) -> bool {
        let Some(queue) = self.queues.get_mut(&user) else {
            return false;
        };
        match queue.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Marks all of the user's notifications read.
    pub fn mark_all_read(&mut self, user: UserId) {
        if let Some(queue) = self.queues.get_mut(&user) {
            for notification in queue {
                notification.read = true;
            }
        }
    }

    /// Drops the user's read notifications.
    pub fn clear_read(&mut self, user: UserId) {
        if let Some(queue) = self.queues.get_mut(&user) {
            queue.retain(|n| !n.read);
        }
    }
}
