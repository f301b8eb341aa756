//! HTTP handler modules for the forest API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`ForestService`](crate::service::ForestService),
//! and wrap the result in an [`ApiResponse`](crate::schema::common::ApiResponse).
//! No hierarchy logic lives in handlers.

pub mod health;
pub mod nodes;
pub mod trees;
