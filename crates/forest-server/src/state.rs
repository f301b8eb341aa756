//! Application state with a shared `ForestService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` so handlers
//! await the lock without blocking the runtime. `rusqlite::Connection` is
//! `!Sync`, which rules out an `RwLock`. Holding the lock for the whole
//! operation also serializes the read-validate-write sequence of concurrent
//! moves within this process; the store's immediate transactions cover
//! other processes sharing the database file.

use std::sync::Arc;

use forest_storage::{SqliteStore, StorageError};

use crate::correlation::{CorrelationIdGenerator, UuidGenerator};
use crate::service::ForestService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<tokio::sync::Mutex<ForestService<SqliteStore>>>,
}

impl AppState {
    /// Opens (and migrates) the SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Ok(Self::with_store(
            SqliteStore::new(db_path)?,
            Arc::new(UuidGenerator),
        ))
    }

    /// In-memory database, for tests.
    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::with_store(
            SqliteStore::in_memory()?,
            Arc::new(UuidGenerator),
        ))
    }

    pub fn with_store(store: SqliteStore, ids: Arc<dyn CorrelationIdGenerator>) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(ForestService::new(store, ids))),
        }
    }
}
