//! Correlation ids attached to every response and exception record.
//!
//! The generator is injected into [`ForestService`](crate::service::ForestService)
//! so the id policy can be swapped without touching request handling.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Produces opaque, unique correlation ids.
pub trait CorrelationIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs. The default for a running server.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl CorrelationIdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... Deterministic, for tests.
#[derive(Debug)]
pub struct SequentialGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialGenerator {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl CorrelationIdGenerator for SequentialGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
