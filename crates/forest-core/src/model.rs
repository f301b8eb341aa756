//! Tree and node entities.

use serde::{Deserialize, Serialize};

use crate::id::{NodeId, TreeId};

/// A named tree. Owns its nodes; the parent/child edges are a property of
/// the nodes themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub id: TreeId,
    pub name: String,
}

/// A node in exactly one tree, optionally attached to a parent in the same
/// tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// `None` for a root node.
    pub parent_id: Option<NodeId>,
    /// Immutable after creation.
    pub tree_id: TreeId,
}

impl Node {
    /// Returns true if the node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A node together with its direct children, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeWithChildren {
    #[serde(flatten)]
    pub node: Node,
    pub children: Vec<Node>,
}

/// A name is valid when it has at least one non-whitespace character.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}
