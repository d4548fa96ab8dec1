//! Record, link, campaign, note, and notification stores for Worldsmith,
//! behind the access-filtered [`World`] facade.
//!
//! This crate provides:
//! - [`RecordStore`] - Generational allocation of entity/location records
//! - [`LinkStore`] - Bidirectional typed-link indices
//! - [`CampaignStore`] - Memberships, characters, and per-campaign overrides
//! - [`NoteStore`] / [`NotificationStore`] - Notes and the notification queue
//! - [`World`] - The facade: validated writes, access-filtered reads

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod campaign;
pub mod link;
pub mod note;
pub mod notify;
pub mod record;
pub mod world;

pub use campaign::{Campaign, CampaignRole, CampaignStore, Character};
pub use link::LinkStore;
pub use note::{Note, NoteAudience, NoteStore};
pub use notify::{Notification, NotificationKind, NotificationStore};
pub use record::{Record, RecordDraft, RecordStore};
pub use world::{RecordView, World};
