//! Snapshot files on disk.
//!
//! Writes are atomic: the image is written to a temporary file in the
//! target directory, synced, and renamed over the destination, so a crash
//! mid-dump leaves either the previous file or the new one, never a torn
//! mixture. A missing file on read is reported as `Ok(None)`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::codec::{decode_snapshot, encode_snapshot};
use crate::error::SnapshotError;
use crate::types::SnapshotData;

/// Atomically write `data` to `path`.
///
/// The parent directory must exist.
pub fn write_snapshot(path: &Path, data: &SnapshotData) -> Result<(), SnapshotError> {
    let bytes = encode_snapshot(data)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| SnapshotError::Io(e.error))?;
    Ok(())
}

/// Read the snapshot at `path`.
///
/// Returns `Ok(None)` if no file exists there.
pub fn read_snapshot(path: &Path) -> Result<Option<SnapshotData>, SnapshotError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SnapshotError::Io(e)),
    };
    decode_snapshot(&bytes).map(Some)
}
