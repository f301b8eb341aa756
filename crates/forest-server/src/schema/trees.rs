//! Tree management request/response types.

use forest_core::{Tree, TreeId};
use serde::{Deserialize, Serialize};

use super::nodes::NodeView;

/// Request to create a new tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTreeRequest {
    pub name: String,
}

/// Request to rename a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameTreeRequest {
    pub name: String,
}

/// A tree as returned by list, create and rename.
#[derive(Debug, Clone, Serialize)]
pub struct TreeView {
    pub id: TreeId,
    pub name: String,
}

impl From<Tree> for TreeView {
    fn from(tree: Tree) -> Self {
        TreeView {
            id: tree.id,
            name: tree.name,
        }
    }
}

/// A single tree with its root nodes.
#[derive(Debug, Clone, Serialize)]
pub struct TreeDetailView {
    pub id: TreeId,
    pub name: String,
    pub root_nodes: Vec<NodeView>,
}
