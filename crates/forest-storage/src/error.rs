//! Storage error types for forest-storage.
//!
//! [`StorageError`] covers every failure the storage layer can report:
//! backend errors, schema migration failures, writes against missing
//! entities, and integrity violations detected in stored data.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite backend reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A write targeted a tree that is not stored.
    #[error("tree not found: {0}")]
    TreeNotFound(i64),

    /// A write targeted a node that is not stored.
    #[error("node not found: {0}")]
    NodeNotFound(i64),

    /// Stored data violates a structural invariant.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
