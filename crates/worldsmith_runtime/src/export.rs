//! Access-filtered JSON export.
//!
//! These functions feed API payloads and external tooling. Record export
//! always goes through the world's filtered read paths, so an export can
//! never leak more than the requesting viewer is allowed to see.

use tracing::info;

use worldsmith_access::Viewer;
use worldsmith_foundation::{Error, ErrorKind, RecordId, Result};
use worldsmith_store::World;

/// Exports one record as pretty-printed JSON, as the viewer sees it.
///
/// # Errors
///
/// Returns a not-found error when the record is dead or the viewer may
/// not see it (indistinguishable by design), or a serialization error.
pub fn export_record(world: &World, viewer: &Viewer, id: RecordId) -> Result<String> {
    let view = world
        .view(viewer, id)
        .ok_or_else(|| Error::record_not_found(id))?;
    serde_json::to_string_pretty(&view)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Exports every record the viewer can read as a pretty-printed JSON
/// array.
///
/// # Errors
///
/// Returns a serialization error if encoding fails.
pub fn export_visible_records(world: &World, viewer: &Viewer) -> Result<String> {
    let views = world.visible_records(viewer);
    let json = serde_json::to_string_pretty(&views)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))?;
    info!(user = %viewer.user, records = views.len(), "records exported");
    Ok(json)
}

/// Exports all type definitions as a pretty-printed JSON array.
///
/// Type definitions are world schema, not record data; they carry no
/// access control.
///
/// # Errors
///
/// Returns a serialization error if encoding fails.
pub fn export_type_definitions(world: &World) -> Result<String> {
    let types: Vec<_> = world.types().iter().collect();
    serde_json::to_string_pretty(&types)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}
