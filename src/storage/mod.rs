//! Storage Module
//!
//! File-backed blob storage with a persistent name↔id registry.
//!
//! ## Responsibilities
//! - Store each blob as one file in the data directory, named by the blob
//! - Assign numeric ids and maintain the name↔id registry (exact inverses)
//! - Snapshot the registry to disk at shutdown, restore it at startup
//!
//! ## Layout
//! ```text
//! {data_dir}/
//!   ├── <blob files>      (one per stored blob)
//!   ├── name_index.bin    (bincode: name → id)
//!   └── id_index.bin      (bincode: id → name)
//! ```
//!
//! There is no log between snapshots: a crash loses id-assignment history
//! made since the last snapshot, but never the blob files themselves.

mod registry;
mod snapshot;
mod store;

pub use registry::{Registry, MAX_FILE_ID};
pub use store::FileStore;
