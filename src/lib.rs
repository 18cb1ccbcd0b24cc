//! # filehub
//!
//! A TCP file store:
//! - Upload, fetch, and delete opaque byte blobs
//! - Blobs addressable by caller-chosen name or server-assigned numeric id
//! - Name↔id registry persisted across restarts via bincode snapshots
//! - Blocking thread-per-connection server with a bounded worker pool
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Acceptor                            │
//! │               (one connection per request)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Worker Pool                               │
//! │           (bounded queue, reject on overflow)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Connection                                │
//! │        (parse request → FileStore → write response)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Registry   │          │  Blob files │
//!   │  (Mutex)    │          │  (data dir) │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │  Snapshots  │
//!   │  (bincode)  │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FileHubError, Result};
pub use config::Config;
pub use storage::FileStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of filehub
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
