//! Node mutations and reads.
//!
//! [`HierarchyEngine`] borrows a store for the duration of a call sequence
//! and keeps nothing of its own. Every mutation is one validate-then-commit
//! unit inside [`ForestStore::atomically`]: all reads and checks first, then
//! exactly one write.

use forest_core::{Node, NodeId, NodeWithChildren, TreeId};
use forest_storage::ForestStore;

use crate::error::EngineError;
use crate::validate::{check_reparent, require_node, require_parent, require_tree, validate_name};

/// Replacement values for [`HierarchyEngine::update_node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUpdate {
    pub name: String,
    /// New parent; `None` makes the node a root.
    pub parent_id: Option<NodeId>,
    /// Owning tree as the caller believes it to be. If present it must
    /// match the stored tree, since a node never changes trees.
    pub tree_id: Option<TreeId>,
}

/// Validating front end for node operations.
pub struct HierarchyEngine<'s, S: ForestStore> {
    store: &'s mut S,
}

impl<'s, S: ForestStore> HierarchyEngine<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        HierarchyEngine { store }
    }

    // -------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------

    /// Creates a childless node in `tree_id`, optionally under `parent_id`.
    pub fn create_node(
        &mut self,
        name: &str,
        tree_id: TreeId,
        parent_id: Option<NodeId>,
    ) -> Result<Node, EngineError> {
        tracing::info!(name, tree = %tree_id, parent = ?parent_id, "creating node");

        let node = self.store.atomically(|store| -> Result<Node, EngineError> {
            validate_name(name)?;
            require_tree(store, tree_id)?;
            if let Some(parent) = parent_id {
                require_parent(store, parent, tree_id)?;
            }
            Ok(store.create_node(name, tree_id, parent_id)?)
        })?;

        tracing::info!(node = %node.id, "node created");
        Ok(node)
    }

    /// Replaces a node's name and parent.
    ///
    /// The parent is validated only when it changes; an absent parent
    /// promotes the node to a root.
    pub fn update_node(&mut self, id: NodeId, update: NodeUpdate) -> Result<Node, EngineError> {
        tracing::info!(node = %id, "updating node");

        let node = self.store.atomically(|store| -> Result<Node, EngineError> {
            let mut node = require_node(store, id)?;

            if let Some(tree) = update.tree_id {
                if tree != node.tree_id {
                    tracing::warn!(node = %id, from = %node.tree_id, to = %tree, "attempt to change tree");
                    return Err(EngineError::TreeChange {
                        node: id,
                        from: node.tree_id,
                        to: tree,
                    });
                }
            }
            validate_name(&update.name)?;

            if update.parent_id != node.parent_id {
                if let Some(parent) = update.parent_id {
                    check_reparent(store, &node, parent)?;
                }
            }

            node.name = update.name;
            node.parent_id = update.parent_id;
            store.update_node(&node)?;
            Ok(node)
        })?;

        tracing::info!(node = %id, "node updated");
        Ok(node)
    }

    /// Changes only the name; the parent is read and written back in the
    /// same unit, so a concurrent move is never undone.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<Node, EngineError> {
        tracing::info!(node = %id, name, "renaming node");

        let node = self.store.atomically(|store| -> Result<Node, EngineError> {
            let mut node = require_node(store, id)?;
            validate_name(name)?;
            node.name = name.to_string();
            store.update_node(&node)?;
            Ok(node)
        })?;

        tracing::info!(node = %id, "node renamed");
        Ok(node)
    }

    /// Re-attaches a node under `new_parent`, or makes it a root when
    /// `new_parent` is `None`. The name is left alone.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<Node, EngineError> {
        tracing::info!(node = %id, parent = ?new_parent, "moving node");

        let node = self.store.atomically(|store| -> Result<Node, EngineError> {
            let mut node = require_node(store, id)?;
            if let Some(parent) = new_parent {
                check_reparent(store, &node, parent)?;
            }
            node.parent_id = new_parent;
            store.update_node(&node)?;
            Ok(node)
        })?;

        tracing::info!(node = %id, "node moved");
        Ok(node)
    }

    /// Deletes a node that has no children.
    pub fn delete_node(&mut self, id: NodeId) -> Result<(), EngineError> {
        tracing::info!(node = %id, "deleting node");

        self.store.atomically(|store| -> Result<(), EngineError> {
            require_node(store, id)?;
            if store.has_children(id)? {
                tracing::warn!(node = %id, "cannot delete node with children");
                return Err(EngineError::HasChildren(id));
            }
            Ok(store.delete_node(id)?)
        })?;

        tracing::info!(node = %id, "node deleted");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Returns the node and its children, or `None` if it does not exist.
    pub fn get_node(&self, id: NodeId) -> Result<Option<NodeWithChildren>, EngineError> {
        let node = self.store.get_node_with_children(id)?;
        if node.is_none() {
            tracing::warn!(node = %id, "node not found");
        }
        Ok(node)
    }

    /// Returns the direct children of a node (empty for unknown ids).
    pub fn get_children(&self, id: NodeId) -> Result<Vec<Node>, EngineError> {
        Ok(self.store.get_children(id)?)
    }

    /// Returns the root nodes of a tree (empty for unknown ids).
    pub fn get_root_nodes(&self, tree: TreeId) -> Result<Vec<Node>, EngineError> {
        Ok(self.store.get_root_nodes(tree)?)
    }
}
