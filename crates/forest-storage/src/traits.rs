//! The [`ForestStore`] trait defining the storage contract for trees and
//! nodes, and the [`ExceptionLogStore`] trait for diagnostic records.
//!
//! Reads report absence through `Option`, `bool` and empty `Vec`s instead of
//! errors; only backend failures surface as [`StorageError`]. Each write
//! touches exactly one row and is atomic on its own. Multi-step
//! validate-then-commit sequences go through [`ForestStore::atomically`].
//!
//! All backends (InMemoryStore, SqliteStore) implement these traits, so the
//! hierarchy engine runs unchanged against either.

use forest_core::{Node, NodeId, NodeWithChildren, Tree, TreeId};

use crate::error::StorageError;
use crate::types::ExceptionLogEntry;

/// The storage contract for the forest.
///
/// The trait is synchronous; callers that share a store across tasks wrap
/// it in a lock.
pub trait ForestStore {
    // -------------------------------------------------------------------
    // Tree operations
    // -------------------------------------------------------------------

    /// Looks up a tree by id.
    fn get_tree(&self, id: TreeId) -> Result<Option<Tree>, StorageError>;

    /// Returns true if a tree with this id is stored.
    fn tree_exists(&self, id: TreeId) -> Result<bool, StorageError>;

    /// Returns true if the tree owns at least one node.
    fn has_nodes(&self, tree: TreeId) -> Result<bool, StorageError>;

    /// Lists all trees ordered by id.
    fn list_trees(&self) -> Result<Vec<Tree>, StorageError>;

    /// Persists a new empty tree and returns it with its allocated id.
    fn create_tree(&mut self, name: &str) -> Result<Tree, StorageError>;

    /// Replaces a tree's name.
    fn rename_tree(&mut self, id: TreeId, name: &str) -> Result<(), StorageError>;

    /// Removes a tree row.
    fn delete_tree(&mut self, id: TreeId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Node operations
    // -------------------------------------------------------------------

    /// Looks up a node by id.
    fn get_node(&self, id: NodeId) -> Result<Option<Node>, StorageError>;

    /// Looks up a node together with its direct children.
    fn get_node_with_children(&self, id: NodeId)
        -> Result<Option<NodeWithChildren>, StorageError>;

    /// Returns the direct children of a node, ordered by id.
    fn get_children(&self, parent: NodeId) -> Result<Vec<Node>, StorageError>;

    /// Returns the parentless nodes of a tree, ordered by id.
    fn get_root_nodes(&self, tree: TreeId) -> Result<Vec<Node>, StorageError>;

    /// Returns true if any node names this one as its parent.
    fn has_children(&self, id: NodeId) -> Result<bool, StorageError>;

    /// Persists a new node and returns it with its allocated id.
    fn create_node(
        &mut self,
        name: &str,
        tree: TreeId,
        parent: Option<NodeId>,
    ) -> Result<Node, StorageError>;

    /// Overwrites the stored name and parent of `node.id`.
    ///
    /// The stored `tree_id` is never changed.
    fn update_node(&mut self, node: &Node) -> Result<(), StorageError>;

    /// Removes a node row.
    fn delete_node(&mut self, id: NodeId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------

    /// Runs `op` so that its reads and its final write form one unit.
    ///
    /// If `op` returns an error nothing it wrote is kept, and no other
    /// writer can change the rows `op` read before it finishes.
    fn atomically<T, E, F>(&mut self, op: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StorageError>;
}

/// Durable sink for records of failed operations.
pub trait ExceptionLogStore {
    /// Appends one record.
    fn record_exception(&mut self, entry: &ExceptionLogEntry) -> Result<(), StorageError>;

    /// Looks up a record by its correlation id.
    fn find_exception(&self, event_id: &str) -> Result<Option<ExceptionLogEntry>, StorageError>;

    /// Lists all records in insertion order.
    fn list_exceptions(&self) -> Result<Vec<ExceptionLogEntry>, StorageError>;
}
