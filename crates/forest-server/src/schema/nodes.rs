//! Node request/response types.

use forest_core::{Node, NodeId, NodeWithChildren, TreeId};
use serde::{Deserialize, Serialize};

/// Request to create a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeRequest {
    pub name: String,
    pub tree_id: TreeId,
    /// Omit (or null) to create a root node.
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

/// Request to replace a node's name and parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNodeRequest {
    pub name: String,
    /// Omit (or null) to make the node a root.
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Optional; must match the node's tree if given.
    #[serde(default)]
    pub tree_id: Option<TreeId>,
}

/// Request to re-attach a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveNodeRequest {
    /// Omit (or null) to promote the node to a root.
    #[serde(default)]
    pub new_parent_id: Option<NodeId>,
}

/// A node and, where the endpoint loads them, its direct children.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub parent_id: Option<NodeId>,
    pub tree_id: TreeId,
    pub children: Vec<NodeView>,
}

impl From<Node> for NodeView {
    fn from(node: Node) -> Self {
        NodeView {
            id: node.id,
            name: node.name,
            parent_id: node.parent_id,
            tree_id: node.tree_id,
            children: Vec::new(),
        }
    }
}

impl From<NodeWithChildren> for NodeView {
    fn from(loaded: NodeWithChildren) -> Self {
        NodeView {
            children: loaded.children.into_iter().map(NodeView::from).collect(),
            ..NodeView::from(loaded.node)
        }
    }
}
