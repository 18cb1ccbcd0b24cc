//! FileStore engine
//!
//! Owns the registry and performs blob reads/writes/deletes against the
//! filesystem.
//!
//! ## Concurrency Model
//!
//! Compound registry mutations (id assignment, dual-map insert, dual-map
//! remove) run under one coarse mutex so the inverse-mapping invariant is
//! never observable mid-update. File I/O happens outside that lock: there is
//! a narrow window where a blob file exists on disk before the registry
//! reflects it (and vice versa for deletes). The consistency target is
//! eventual agreement between disk and registry, not atomicity.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{FileHubError, Result};

use super::registry::Registry;
use super::snapshot;

/// The file-storage engine
pub struct FileStore {
    /// Directory holding blob files and the two snapshot files
    data_dir: PathBuf,

    /// name → id snapshot path
    name_index_path: PathBuf,

    /// id → name snapshot path
    id_index_path: PathBuf,

    /// The dual mapping, serialized behind one coarse lock
    registry: Mutex<Registry>,
}

impl FileStore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const NAME_INDEX_FILENAME: &'static str = "name_index.bin";
    const ID_INDEX_FILENAME: &'static str = "id_index.bin";

    /// Open or create a store rooted at the configured data directory.
    ///
    /// Restores the registry from the last snapshot; missing or unreadable
    /// snapshots yield an empty registry (non-fatal).
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_path(&config.data_dir)
    }

    /// Open with an explicit data directory
    pub fn open_path(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let name_index_path = data_dir.join(Self::NAME_INDEX_FILENAME);
        let id_index_path = data_dir.join(Self::ID_INDEX_FILENAME);

        // The two snapshot files are restored as a pair: if either fails to
        // load, or the loaded maps are not exact inverses, both are discarded
        // so the registry never starts in a lopsided state.
        let registry = match (
            snapshot::load_map::<HashMap<String, u64>>(&name_index_path),
            snapshot::load_map::<HashMap<u64, String>>(&id_index_path),
        ) {
            (Ok(name_to_id), Ok(id_to_name)) => {
                let restored = Registry::from_parts(name_to_id, id_to_name);
                if restored.is_consistent() {
                    restored
                } else {
                    tracing::warn!(
                        "snapshot maps in {} are not inverses, starting from an empty registry",
                        data_dir.display()
                    );
                    Registry::new()
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("cannot restore registry, starting from an empty one: {}", e);
                Registry::new()
            }
        };

        if !registry.is_empty() {
            tracing::info!("restored registry with {} entries", registry.len());
        }

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            name_index_path,
            id_index_path,
            registry: Mutex::new(registry),
        })
    }

    /// Store `content` under `name`, returning the assigned id.
    ///
    /// Fails with `AlreadyExists` if a file already exists at the target
    /// path (no overwrite semantics). The file is written before the
    /// registry is updated; see the module docs for the consistency window.
    pub fn put(&self, name: &str, content: &[u8]) -> Result<u64> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(FileHubError::Protocol(format!(
                "invalid blob name: {:?}",
                name
            )));
        }

        let path = self.blob_path(name);
        if path.exists() {
            return Err(FileHubError::AlreadyExists);
        }
        fs::write(&path, content)?;

        // A racing put of the same name may have bound it between the exists
        // check and here; report the conflict instead of breaking the inverse
        // invariant.
        let id = match self.registry.lock().bind(name) {
            Some(id) => id,
            None => {
                // A failed PUT must leave the filesystem unmutated; an
                // orphaned file would 403 every future PUT of this name
                if let Err(e) = fs::remove_file(&path) {
                    tracing::warn!("failed to remove {:?} after put conflict: {}", name, e);
                }
                return Err(FileHubError::AlreadyExists);
            }
        };

        tracing::debug!("stored {:?} ({} bytes) as id {}", name, content.len(), id);
        Ok(id)
    }

    /// Fetch a blob by name
    pub fn get_by_name(&self, name: &str) -> Result<Vec<u8>> {
        if self.registry.lock().id_for(name).is_none() {
            return Err(FileHubError::NotFound);
        }
        self.read_blob(name)
    }

    /// Fetch a blob by id
    pub fn get_by_id(&self, id: u64) -> Result<Vec<u8>> {
        let name = match self.registry.lock().name_for(id) {
            Some(name) => name.to_string(),
            None => return Err(FileHubError::NotFound),
        };
        self.read_blob(&name)
    }

    /// Delete a blob by name.
    ///
    /// Returns false for an unknown name and for a registry entry whose
    /// backing file is missing on disk; in the latter case the stale entry
    /// is left in place (no self-healing).
    pub fn delete_by_name(&self, name: &str) -> bool {
        if self.registry.lock().id_for(name).is_none() {
            return false;
        }
        if !self.remove_blob_file(name) {
            return false;
        }
        self.registry.lock().unbind_name(name);
        tracing::debug!("deleted {:?}", name);
        true
    }

    /// Delete a blob by id (same semantics as [`delete_by_name`])
    ///
    /// [`delete_by_name`]: FileStore::delete_by_name
    pub fn delete_by_id(&self, id: u64) -> bool {
        let name = match self.registry.lock().name_for(id) {
            Some(name) => name.to_string(),
            None => return false,
        };
        if !self.remove_blob_file(&name) {
            return false;
        }
        self.registry.lock().unbind_id(id);
        tracing::debug!("deleted id {} ({:?})", id, name);
        true
    }

    /// Point-in-time listing of all `(id, name)` pairs, sorted by id.
    ///
    /// Diagnostic only; a read concurrent with writers may be stale.
    pub fn list(&self) -> Vec<(u64, String)> {
        self.registry.lock().entries()
    }

    /// Write both registry maps to their snapshot files
    pub fn snapshot(&self) -> Result<()> {
        let registry = self.registry.lock();
        let (name_to_id, id_to_name) = registry.parts();
        snapshot::save_map(&self.name_index_path, name_to_id)?;
        snapshot::save_map(&self.id_index_path, id_to_name)?;
        tracing::debug!("snapshotted registry with {} entries", registry.len());
        Ok(())
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn blob_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Read a blob file; a missing file under a live registry entry is
    /// reported as `NotFound` and the entry left dangling.
    fn read_blob(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(name);
        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) => {
                tracing::warn!("cannot read blob {:?} at {}: {}", name, path.display(), e);
                Err(FileHubError::NotFound)
            }
        }
    }

    /// Remove a blob file from disk; false when it is not a regular file
    /// or the removal fails.
    fn remove_blob_file(&self, name: &str) -> bool {
        let path = self.blob_path(name);
        if !path.is_file() {
            return false;
        }
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!("failed to delete blob {:?}: {}", name, e);
            return false;
        }
        true
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Number of blobs currently registered
    pub fn blob_count(&self) -> usize {
        self.registry.lock().len()
    }
}
