//! Storage-layer types for diagnostic records.
//!
//! [`ExceptionLogEntry`] lives here rather than in forest-core because the
//! exception log is a persistence concern: the hierarchy model never sees it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One durable record of a failed operation, keyed by its correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionLogEntry {
    /// Correlation id returned to the caller.
    pub event_id: String,
    /// When the failure was recorded.
    pub timestamp: DateTime<Utc>,
    /// Operation that failed, e.g. `"move_node"`.
    pub operation: String,
    /// Request parameters as received.
    pub parameters: serde_json::Value,
    /// Error kind label: `"reference"`, `"constraint"` or `"store"`.
    pub error_kind: String,
    /// Full error message. Never sent to the caller for store failures.
    pub message: String,
}
