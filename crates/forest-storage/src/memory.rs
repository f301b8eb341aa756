//! In-memory implementation of [`ForestStore`] and [`ExceptionLogStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and anywhere
//! persistence isn't needed. It keeps every entity in `BTreeMap`s keyed by id
//! (so listings come out ordered by id, like the SQLite backend) and never
//! reuses an id after deletion.

use std::collections::BTreeMap;

use forest_core::{Node, NodeId, NodeWithChildren, Tree, TreeId};

use crate::error::StorageError;
use crate::traits::{ExceptionLogStore, ForestStore};
use crate::types::ExceptionLogEntry;

/// Everything a transaction may need to put back.
#[derive(Debug, Clone, Default)]
struct Tables {
    /// Tree names indexed by TreeId
    trees: BTreeMap<TreeId, String>,
    /// Nodes indexed by NodeId
    nodes: BTreeMap<NodeId, Node>,
    /// Next tree ID counter
    next_tree_id: i64,
    /// Next node ID counter
    next_node_id: i64,
}

/// In-memory implementation of [`ForestStore`].
#[derive(Debug)]
pub struct InMemoryStore {
    tables: Tables,
    exceptions: Vec<ExceptionLogEntry>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        InMemoryStore {
            tables: Tables {
                next_tree_id: 1,
                next_node_id: 1,
                ..Tables::default()
            },
            exceptions: Vec::new(),
        }
    }

    fn children_of(&self, parent: NodeId) -> impl Iterator<Item = &Node> {
        self.tables
            .nodes
            .values()
            .filter(move |n| n.parent_id == Some(parent))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestStore for InMemoryStore {
    // -------------------------------------------------------------------
    // Tree operations
    // -------------------------------------------------------------------

    fn get_tree(&self, id: TreeId) -> Result<Option<Tree>, StorageError> {
        Ok(self.tables.trees.get(&id).map(|name| Tree {
            id,
            name: name.clone(),
        }))
    }

    fn tree_exists(&self, id: TreeId) -> Result<bool, StorageError> {
        Ok(self.tables.trees.contains_key(&id))
    }

    fn has_nodes(&self, tree: TreeId) -> Result<bool, StorageError> {
        Ok(self.tables.nodes.values().any(|n| n.tree_id == tree))
    }

    fn list_trees(&self) -> Result<Vec<Tree>, StorageError> {
        Ok(self
            .tables
            .trees
            .iter()
            .map(|(&id, name)| Tree {
                id,
                name: name.clone(),
            })
            .collect())
    }

    fn create_tree(&mut self, name: &str) -> Result<Tree, StorageError> {
        let id = TreeId(self.tables.next_tree_id);
        self.tables.next_tree_id += 1;
        self.tables.trees.insert(id, name.to_string());
        Ok(Tree {
            id,
            name: name.to_string(),
        })
    }

    fn rename_tree(&mut self, id: TreeId, name: &str) -> Result<(), StorageError> {
        let stored = self
            .tables
            .trees
            .get_mut(&id)
            .ok_or(StorageError::TreeNotFound(id.0))?;
        *stored = name.to_string();
        Ok(())
    }

    fn delete_tree(&mut self, id: TreeId) -> Result<(), StorageError> {
        if self.has_nodes(id)? {
            return Err(StorageError::IntegrityError {
                reason: format!("tree {} still owns nodes", id),
            });
        }
        self.tables
            .trees
            .remove(&id)
            .ok_or(StorageError::TreeNotFound(id.0))?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Node operations
    // -------------------------------------------------------------------

    fn get_node(&self, id: NodeId) -> Result<Option<Node>, StorageError> {
        Ok(self.tables.nodes.get(&id).cloned())
    }

    fn get_node_with_children(
        &self,
        id: NodeId,
    ) -> Result<Option<NodeWithChildren>, StorageError> {
        Ok(self.tables.nodes.get(&id).map(|node| NodeWithChildren {
            node: node.clone(),
            children: self.children_of(id).cloned().collect(),
        }))
    }

    fn get_children(&self, parent: NodeId) -> Result<Vec<Node>, StorageError> {
        Ok(self.children_of(parent).cloned().collect())
    }

    fn get_root_nodes(&self, tree: TreeId) -> Result<Vec<Node>, StorageError> {
        Ok(self
            .tables
            .nodes
            .values()
            .filter(|n| n.tree_id == tree && n.parent_id.is_none())
            .cloned()
            .collect())
    }

    fn has_children(&self, id: NodeId) -> Result<bool, StorageError> {
        Ok(self.children_of(id).next().is_some())
    }

    fn create_node(
        &mut self,
        name: &str,
        tree: TreeId,
        parent: Option<NodeId>,
    ) -> Result<Node, StorageError> {
        // Same referential guarantees the SQLite foreign keys give.
        if !self.tables.trees.contains_key(&tree) {
            return Err(StorageError::TreeNotFound(tree.0));
        }
        if let Some(parent) = parent {
            if !self.tables.nodes.contains_key(&parent) {
                return Err(StorageError::NodeNotFound(parent.0));
            }
        }

        let node = Node {
            id: NodeId(self.tables.next_node_id),
            name: name.to_string(),
            parent_id: parent,
            tree_id: tree,
        };
        self.tables.next_node_id += 1;
        self.tables.nodes.insert(node.id, node.clone());
        Ok(node)
    }

    fn update_node(&mut self, node: &Node) -> Result<(), StorageError> {
        if let Some(parent) = node.parent_id {
            if !self.tables.nodes.contains_key(&parent) {
                return Err(StorageError::NodeNotFound(parent.0));
            }
        }
        let stored = self
            .tables
            .nodes
            .get_mut(&node.id)
            .ok_or(StorageError::NodeNotFound(node.id.0))?;
        stored.name = node.name.clone();
        stored.parent_id = node.parent_id;
        Ok(())
    }

    fn delete_node(&mut self, id: NodeId) -> Result<(), StorageError> {
        if self.has_children(id)? {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} still has children", id),
            });
        }
        self.tables
            .nodes
            .remove(&id)
            .ok_or(StorageError::NodeNotFound(id.0))?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------

    fn atomically<T, E, F>(&mut self, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StorageError>,
    {
        let snapshot = self.tables.clone();
        let result = op(self);
        if result.is_err() {
            self.tables = snapshot;
        }
        result
    }
}

impl ExceptionLogStore for InMemoryStore {
    fn record_exception(&mut self, entry: &ExceptionLogEntry) -> Result<(), StorageError> {
        if self.exceptions.iter().any(|e| e.event_id == entry.event_id) {
            return Err(StorageError::IntegrityError {
                reason: format!("duplicate exception event id {}", entry.event_id),
            });
        }
        self.exceptions.push(entry.clone());
        Ok(())
    }

    fn find_exception(&self, event_id: &str) -> Result<Option<ExceptionLogEntry>, StorageError> {
        Ok(self
            .exceptions
            .iter()
            .find(|e| e.event_id == event_id)
            .cloned())
    }

    fn list_exceptions(&self) -> Result<Vec<ExceptionLogEntry>, StorageError> {
        Ok(self.exceptions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn ids_are_allocated_in_order_and_never_reused() {
        let mut store = InMemoryStore::new();
        let tree = store.create_tree("t").unwrap();
        let a = store.create_node("a", tree.id, None).unwrap();
        store.delete_node(a.id).unwrap();
        let b = store.create_node("b", tree.id, None).unwrap();

        assert_eq!(tree.id, TreeId(1));
        assert_eq!(a.id, NodeId(1));
        assert_eq!(b.id, NodeId(2));
        assert!(store.get_node(a.id).unwrap().is_none());
    }

    #[test]
    fn children_and_roots_are_ordered_by_id() {
        let mut store = InMemoryStore::new();
        let tree = store.create_tree("t").unwrap();
        let other = store.create_tree("other").unwrap();
        let root = store.create_node("root", tree.id, None).unwrap();
        let c1 = store.create_node("c1", tree.id, Some(root.id)).unwrap();
        let c2 = store.create_node("c2", tree.id, Some(root.id)).unwrap();
        let second_root = store.create_node("root2", tree.id, None).unwrap();
        store.create_node("elsewhere", other.id, None).unwrap();

        let children: Vec<NodeId> = store
            .get_children(root.id)
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(children, vec![c1.id, c2.id]);

        let roots: Vec<NodeId> = store
            .get_root_nodes(tree.id)
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(roots, vec![root.id, second_root.id]);

        let with_children = store.get_node_with_children(root.id).unwrap().unwrap();
        assert_eq!(with_children.children.len(), 2);
        assert!(store.has_children(root.id).unwrap());
        assert!(!store.has_children(c2.id).unwrap());
    }

    #[test]
    fn update_node_keeps_tree_id() {
        let mut store = InMemoryStore::new();
        let t1 = store.create_tree("t1").unwrap();
        let t2 = store.create_tree("t2").unwrap();
        let mut node = store.create_node("n", t1.id, None).unwrap();

        node.name = "renamed".into();
        node.tree_id = t2.id;
        store.update_node(&node).unwrap();

        let stored = store.get_node(node.id).unwrap().unwrap();
        assert_eq!(stored.name, "renamed");
        assert_eq!(stored.tree_id, t1.id);
    }

    #[test]
    fn writes_against_missing_entities_fail() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.rename_tree(TreeId(9), "x"),
            Err(StorageError::TreeNotFound(9))
        ));
        assert!(matches!(
            store.create_node("x", TreeId(9), None),
            Err(StorageError::TreeNotFound(9))
        ));
        assert!(matches!(
            store.delete_node(NodeId(4)),
            Err(StorageError::NodeNotFound(4))
        ));
    }

    #[test]
    fn delete_refuses_to_orphan() {
        let mut store = InMemoryStore::new();
        let tree = store.create_tree("t").unwrap();
        let root = store.create_node("root", tree.id, None).unwrap();
        store.create_node("child", tree.id, Some(root.id)).unwrap();

        assert!(matches!(
            store.delete_node(root.id),
            Err(StorageError::IntegrityError { .. })
        ));
        assert!(matches!(
            store.delete_tree(tree.id),
            Err(StorageError::IntegrityError { .. })
        ));
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let mut store = InMemoryStore::new();
        let tree = store.create_tree("t").unwrap();

        let result: Result<(), StorageError> = store.atomically(|s| {
            s.create_node("doomed", tree.id, None)?;
            Err(StorageError::IntegrityError {
                reason: "abort".into(),
            })
        });

        assert!(result.is_err());
        assert!(!store.has_nodes(tree.id).unwrap());
        // The counter is restored too.
        let node = store.create_node("kept", tree.id, None).unwrap();
        assert_eq!(node.id, NodeId(1));
    }

    #[test]
    fn exception_log_round_trip() {
        let mut store = InMemoryStore::new();
        let entry = ExceptionLogEntry {
            event_id: "evt-1".into(),
            timestamp: Utc::now(),
            operation: "delete_node".into(),
            parameters: serde_json::json!({ "id": 3 }),
            error_kind: "constraint".into(),
            message: "node 3 has children".into(),
        };
        store.record_exception(&entry).unwrap();

        assert_eq!(store.find_exception("evt-1").unwrap(), Some(entry.clone()));
        assert!(store.find_exception("evt-2").unwrap().is_none());
        assert!(store.record_exception(&entry).is_err());
        assert_eq!(store.list_exceptions().unwrap().len(), 1);
    }
}
