//! Registry snapshots
//!
//! Persistence codec for the registry maps. Each map is serialized
//! independently to its own file with bincode, written at graceful shutdown
//! and read once at startup.
//!
//! A missing or empty snapshot file means "no prior state" (empty map). Read
//! and decode failures are reported to the caller: the store treats the two
//! files as a pair and discards both when either cannot be restored, so a
//! half-readable snapshot can never produce a lopsided registry.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FileHubError, Result};

/// Serialize a map to its snapshot file, replacing any previous snapshot
pub fn save_map<T: Serialize>(path: &Path, map: &T) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, map)
        .map_err(|e| FileHubError::Snapshot(format!("failed to encode {}: {}", path.display(), e)))
}

/// Deserialize a map from its snapshot file.
///
/// A missing or empty file yields the empty map; open and decode failures
/// are errors so the caller can discard the snapshot pair.
pub fn load_map<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(_) => return Ok(T::default()),
    };
    if len == 0 {
        return Ok(T::default());
    }

    let file = File::open(path)?;
    // Same wire format as `bincode::deserialize_from` (fixint, trailing bytes
    // allowed), but cap decoding at the file's own length so a corrupt length
    // prefix yields a decode error instead of aborting on a huge allocation.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(len)
        .deserialize_from(BufReader::new(file))
        .map_err(|e| FileHubError::Snapshot(format!("failed to decode {}: {}", path.display(), e)))
}
