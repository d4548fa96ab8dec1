//! World persistence and JSON interchange for Worldsmith.
//!
//! This crate provides:
//! - [`serialize`] - Whole-world save/load in `MessagePack`
//! - [`export`] - Access-filtered JSON export of records and type
//!   definitions for API payloads and external tooling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod export;
pub mod serialize;

pub use export::{export_record, export_type_definitions, export_visible_records};
pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
