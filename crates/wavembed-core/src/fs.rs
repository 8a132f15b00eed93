//! File helpers for publishing generated artifacts.
//!
//! Outputs are staged in a temporary file next to the destination and
//! renamed into place only once fully written, so a failed run never
//! leaves a truncated WAV or header behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    staged
        .write_all(contents)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| Error::io(staged.path(), e))?;

    staged
        .persist(path)
        .map_err(|e| Error::io(path, e.error))?;

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Read a whole file, attaching the path to any failure
pub fn read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| Error::io(path, e))
}
