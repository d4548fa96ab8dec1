//! Whole-world persistence in `MessagePack`.
//!
//! A saved world is a single binary snapshot of every registry and store.
//! `MessagePack` is the only whole-world format: the link indices are keyed
//! by structured record ids, which JSON maps cannot represent.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::info;

use worldsmith_foundation::{Error, ErrorKind, Result};
use worldsmith_store::World;

fn io_err(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} '{}': {e}",
        path.display()
    )))
}

/// Encodes a world as `MessagePack` bytes.
///
/// Field names are preserved (named serialization), so snapshots survive
/// field reordering in a newer build.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(world: &World) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(world)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Decodes a world from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<World> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Writes a world snapshot to a file, replacing any existing content.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be
/// written.
pub fn save_to_file<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(world)?;

    let file = File::create(path).map_err(|e| io_err("create file", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_err("write to file", path, &e))?;
    writer.flush().map_err(|e| io_err("flush file", path, &e))?;

    info!(path = %path.display(), bytes = bytes.len(), "world saved");
    Ok(())
}

/// Reads a world snapshot back from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the bytes do not
/// decode.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<World> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_err("open file", path, &e))?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_err("read file", path, &e))?;

    let world = from_bytes(&bytes)?;
    info!(path = %path.display(), "world loaded");
    Ok(world)
}
