//! Identifiers for records and the surrounding application objects.
//!
//! Records (entities and locations) use generational identifiers so that
//! references held in payloads can be detected as stale after the record is
//! destroyed and its slot reused. Users, campaigns, characters, and the other
//! application objects are identified by plain numeric ids issued either by
//! this library's stores or by out-of-scope collaborators (auth, sessions).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two record families a type can describe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordClass {
    /// A world entity: character, faction, item, event, ...
    Entity,
    /// A place in the world.
    Location,
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity => write!(f, "entity"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// Record identifier with a generational index for stale reference detection.
///
/// The generation counter increments when a record slot is reused after
/// destruction, so a reference captured before the destruction no longer
/// resolves.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordId {
    /// Index into record storage.
    pub index: u64,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl RecordId {
    /// Creates a record id with the given index and generation.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns a sentinel value representing "no record".
    #[must_use]
    pub const fn null() -> Self {
        Self {
            index: u64::MAX,
            generation: 0,
        }
    }

    /// Returns true if this is the null sentinel value.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index == u64::MAX
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "RecordId(null)")
        } else {
            write!(f, "RecordId({}v{})", self.index, self.generation)
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Record(null)")
        } else {
            write!(f, "Record({})", self.index)
        }
    }
}

macro_rules! plain_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id value.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw id value.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

plain_id! {
    /// Identifies a user account. Issued by the authentication collaborator.
    UserId
}

plain_id! {
    /// Identifies a campaign.
    CampaignId
}

plain_id! {
    /// Identifies a player character within a campaign.
    CharacterId
}

plain_id! {
    /// Identifies a registered entity or location type.
    TypeId
}

plain_id! {
    /// Identifies a note attached to a record.
    NoteId
}

plain_id! {
    /// Identifies a queued notification.
    NotificationId
}
