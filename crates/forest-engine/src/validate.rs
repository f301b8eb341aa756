//! Checks shared by the hierarchy engine and the tree registry.
//!
//! Each helper performs the store reads it needs and returns the entity it
//! validated, so callers never read the same row twice.

use forest_core::{is_valid_name, Node, NodeId, Tree, TreeId};
use forest_storage::ForestStore;

use crate::ancestry::is_descendant;
use crate::error::EngineError;

/// Rejects names without visible characters.
pub fn validate_name(name: &str) -> Result<(), EngineError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        tracing::warn!("rejected empty name");
        Err(EngineError::InvalidName)
    }
}

/// Loads a tree or fails with [`EngineError::TreeNotFound`].
pub fn require_tree<S: ForestStore + ?Sized>(store: &S, id: TreeId) -> Result<Tree, EngineError> {
    store.get_tree(id)?.ok_or_else(|| {
        tracing::warn!(tree = %id, "tree not found");
        EngineError::TreeNotFound(id)
    })
}

/// Loads a node or fails with [`EngineError::NodeNotFound`].
pub fn require_node<S: ForestStore + ?Sized>(store: &S, id: NodeId) -> Result<Node, EngineError> {
    store.get_node(id)?.ok_or_else(|| {
        tracing::warn!(node = %id, "node not found");
        EngineError::NodeNotFound(id)
    })
}

/// Loads a prospective parent and checks it belongs to `tree`.
pub fn require_parent<S: ForestStore + ?Sized>(
    store: &S,
    parent: NodeId,
    tree: TreeId,
) -> Result<Node, EngineError> {
    let node = store.get_node(parent)?.ok_or_else(|| {
        tracing::warn!(parent = %parent, "parent node not found");
        EngineError::ParentNotFound(parent)
    })?;

    if node.tree_id != tree {
        tracing::warn!(
            parent = %parent,
            parent_tree = %node.tree_id,
            tree = %tree,
            "parent belongs to a different tree"
        );
        return Err(EngineError::CrossTreeParent {
            parent,
            parent_tree: node.tree_id,
            tree,
        });
    }
    Ok(node)
}

/// Checks that `node` may be attached under `new_parent`.
///
/// Rejects the node itself, unknown parents, parents in another tree, and
/// parents that are descendants of `node`.
pub fn check_reparent<S: ForestStore + ?Sized>(
    store: &S,
    node: &Node,
    new_parent: NodeId,
) -> Result<(), EngineError> {
    if new_parent == node.id {
        tracing::warn!(node = %node.id, "node cannot be its own parent");
        return Err(EngineError::SelfParent(node.id));
    }

    require_parent(store, new_parent, node.tree_id)?;

    if is_descendant(store, node.id, new_parent)? {
        tracing::warn!(node = %node.id, parent = %new_parent, "move would create a cycle");
        return Err(EngineError::Cycle {
            node: node.id,
            parent: new_parent,
        });
    }
    Ok(())
}
