//! Configuration for filehub
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a filehub instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── <blob files>     (one file per stored blob, named by the blob)
    ///     ├── name_index.bin   (name → id snapshot)
    ///     └── id_index.bin     (id → name snapshot)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads handling connections
    pub worker_threads: usize,

    /// Max connections queued for a free worker before new ones are rejected
    pub queue_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./filehub_data"),
            listen_addr: "127.0.0.1:23456".to_string(),
            worker_threads: 8,
            queue_depth: 64,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (blobs and registry snapshots)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the pending-connection queue depth
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.config.queue_depth = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
