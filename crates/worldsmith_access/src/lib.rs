//! Visibility and access-control evaluation for Worldsmith.
//!
//! This crate provides:
//! - [`Visibility`] / [`AccessPolicy`] - Per-record exposure defaults and
//!   fine-grained read/write permission with allow-lists
//! - [`Viewer`] - The requesting user/campaign/character context
//! - [`read_exposure`] / [`can_write`] - The evaluator every read and write
//!   path is filtered through
//! - [`Importance`] / [`CampaignOverride`] - Campaign-scoped override layer
//!
//! The evaluator is pure decision logic: it never touches storage, so the
//! store layer can resolve the viewer context once and evaluate per record.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod evaluate;
pub mod policy;
pub mod viewer;

pub use evaluate::{Exposure, can_write, read_exposure, read_exposure_with_override};
pub use policy::{AccessLevel, AccessPolicy, AllowList, CampaignOverride, Importance, Visibility};
pub use viewer::Viewer;
