//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for one API
//! domain. Types use serde derives for JSON serialization/deserialization.

pub mod common;
pub mod nodes;
pub mod trees;
