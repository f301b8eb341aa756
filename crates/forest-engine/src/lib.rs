//! Hierarchy-consistency engine for a forest of labeled trees.
//!
//! Every mutation is validated against the store before its single commit,
//! so the parent relation stays acyclic and tree-scoped:
//!
//! - [`ancestry`]: upward reachability over parent pointers
//! - [`hierarchy`]: node create / update / move / delete and reads
//! - [`registry`]: tree create / rename / delete and reads
//! - [`validate`]: checks shared by both engines
//! - [`error`]: EngineError and its three error kinds

pub mod ancestry;
pub mod error;
pub mod hierarchy;
pub mod registry;
pub mod validate;

pub use ancestry::{ancestors, is_descendant};
pub use error::{EngineError, ErrorKind};
pub use hierarchy::{HierarchyEngine, NodeUpdate};
pub use registry::TreeRegistry;
