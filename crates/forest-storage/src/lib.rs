//! Storage abstraction for the forest hierarchy.
//!
//! Provides the [`ForestStore`] trait defining the storage contract that the
//! hierarchy engine is written against, the [`ExceptionLogStore`] trait for
//! durable diagnostic records, and two first-class backends:
//! [`InMemoryStore`] and [`SqliteStore`].
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: ExceptionLogEntry and related storage-layer types
//! - [`traits`]: ForestStore and ExceptionLogStore trait definitions
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ExceptionLogStore, ForestStore};
pub use types::ExceptionLogEntry;
