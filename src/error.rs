//! Error types for filehub
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FileHubError
pub type Result<T> = std::result::Result<T, FileHubError>;

/// Unified error type for filehub operations
#[derive(Debug, Error)]
pub enum FileHubError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("File already exists")]
    AlreadyExists,

    #[error("File not found")]
    NotFound,

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
