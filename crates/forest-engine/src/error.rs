//! Engine error types.
//!
//! [`EngineError`] variants fall into three kinds (see [`ErrorKind`]):
//! references to missing entities, hierarchy constraint violations, and
//! opaque storage failures. The first two are expected outcomes and their
//! messages are safe to show to a caller; store failures are not.

use forest_core::{NodeId, TreeId};
use forest_storage::StorageError;
use thiserror::Error;

/// Classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The operation named a tree or node that does not exist.
    Reference,
    /// The operation is well-formed but would break a hierarchy invariant.
    Constraint,
    /// The store failed.
    Store,
}

impl ErrorKind {
    /// Lower-case label used in logs and diagnostic records.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Reference => "reference",
            ErrorKind::Constraint => "constraint",
            ErrorKind::Store => "store",
        }
    }
}

/// Errors produced by the hierarchy engine and tree registry.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("tree {0} does not exist")]
    TreeNotFound(TreeId),

    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("parent node {0} does not exist")]
    ParentNotFound(NodeId),

    #[error("parent node {parent} belongs to tree {parent_tree}, not tree {tree}")]
    CrossTreeParent {
        parent: NodeId,
        parent_tree: TreeId,
        tree: TreeId,
    },

    #[error("cannot move node {node} under its own descendant {parent}")]
    Cycle { node: NodeId, parent: NodeId },

    #[error("node {0} cannot be its own parent")]
    SelfParent(NodeId),

    #[error("node {0} has children; delete or move them first")]
    HasChildren(NodeId),

    #[error("tree {0} still has nodes; delete them first")]
    TreeHasNodes(TreeId),

    #[error("cannot move node {node} from tree {from} to tree {to}")]
    TreeChange { node: NodeId, from: TreeId, to: TreeId },

    #[error("name must not be empty")]
    InvalidName,

    #[error(transparent)]
    Store(#[from] StorageError),
}

impl EngineError {
    /// Returns the kind this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::TreeNotFound(_)
            | EngineError::NodeNotFound(_)
            | EngineError::ParentNotFound(_) => ErrorKind::Reference,
            EngineError::CrossTreeParent { .. }
            | EngineError::Cycle { .. }
            | EngineError::SelfParent(_)
            | EngineError::HasChildren(_)
            | EngineError::TreeHasNodes(_)
            | EngineError::TreeChange { .. }
            | EngineError::InvalidName => ErrorKind::Constraint,
            EngineError::Store(_) => ErrorKind::Store,
        }
    }
}
