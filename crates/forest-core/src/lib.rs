//! Entity model for the forest hierarchy.
//!
//! Trees own nodes; nodes point at their parent by id. Nothing here holds a
//! live reference to another entity, so every cross-link is resolved through
//! a store lookup.

pub mod id;
pub mod model;

pub use id::{NodeId, TreeId};
pub use model::{is_valid_name, Node, NodeWithChildren, Tree};
