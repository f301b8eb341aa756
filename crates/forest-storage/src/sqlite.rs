//! SQLite implementation of [`ForestStore`] and [`ExceptionLogStore`].
//!
//! [`SqliteStore`] persists trees, nodes and exception records in a SQLite
//! database with WAL mode, enforced foreign keys and automatic schema
//! migrations. Single-row writes are atomic on their own; multi-step
//! operations run under [`ForestStore::atomically`], which holds SQLite's
//! write lock (`BEGIN IMMEDIATE`) from the first read to the commit.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use forest_core::{Node, NodeId, NodeWithChildren, Tree, TreeId};

use crate::error::StorageError;
use crate::traits::{ExceptionLogStore, ForestStore};
use crate::types::ExceptionLogEntry;

const NODE_COLUMNS: &str = "id, name, parent_id, tree_id";

/// SQLite-backed implementation of [`ForestStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens a private in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// A failed rollback may leave the connection inside a transaction that
    /// later calls would join; reported as an integrity failure.
    fn rollback(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|err| StorageError::IntegrityError {
                reason: format!("rollback failed: {}", err),
            })
    }

    fn node_from_row(row: &Row<'_>) -> rusqlite::Result<Node> {
        Ok(Node {
            id: NodeId(row.get(0)?),
            name: row.get(1)?,
            parent_id: row.get::<_, Option<i64>>(2)?.map(NodeId),
            tree_id: TreeId(row.get(3)?),
        })
    }

    fn tree_from_row(row: &Row<'_>) -> rusqlite::Result<Tree> {
        Ok(Tree {
            id: TreeId(row.get(0)?),
            name: row.get(1)?,
        })
    }

    /// Runs a node query with one parameter and collects the rows.
    fn query_nodes(&self, sql: &str, param: i64) -> Result<Vec<Node>, StorageError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params![param], Self::node_from_row)?;
        let mut nodes = Vec::new();
        for row in rows {
            nodes.push(row?);
        }
        Ok(nodes)
    }

    fn exists(&self, sql: &str, param: i64) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(sql, params![param], |row| row.get(0))?;
        Ok(exists)
    }

    /// Raw exception row; `parameters` is still JSON text.
    fn exception_from_row(
        row: &Row<'_>,
    ) -> rusqlite::Result<(String, DateTime<Utc>, String, String, String, String)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn exception_from_parts(
        parts: (String, DateTime<Utc>, String, String, String, String),
    ) -> Result<ExceptionLogEntry, StorageError> {
        let (event_id, timestamp, operation, parameters, error_kind, message) = parts;
        Ok(ExceptionLogEntry {
            event_id,
            timestamp,
            operation,
            parameters: serde_json::from_str(&parameters)?,
            error_kind,
            message,
        })
    }
}

impl ForestStore for SqliteStore {
    // -------------------------------------------------------------------
    // Tree operations
    // -------------------------------------------------------------------

    fn get_tree(&self, id: TreeId) -> Result<Option<Tree>, StorageError> {
        let tree = self
            .conn
            .query_row(
                "SELECT id, name FROM trees WHERE id = ?1",
                params![id.0],
                Self::tree_from_row,
            )
            .optional()?;
        Ok(tree)
    }

    fn tree_exists(&self, id: TreeId) -> Result<bool, StorageError> {
        self.exists("SELECT EXISTS(SELECT 1 FROM trees WHERE id = ?1)", id.0)
    }

    fn has_nodes(&self, tree: TreeId) -> Result<bool, StorageError> {
        self.exists("SELECT EXISTS(SELECT 1 FROM nodes WHERE tree_id = ?1)", tree.0)
    }

    fn list_trees(&self) -> Result<Vec<Tree>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM trees ORDER BY id")?;
        let rows = stmt.query_map([], Self::tree_from_row)?;
        let mut trees = Vec::new();
        for row in rows {
            trees.push(row?);
        }
        Ok(trees)
    }

    fn create_tree(&mut self, name: &str) -> Result<Tree, StorageError> {
        self.conn
            .execute("INSERT INTO trees (name) VALUES (?1)", params![name])?;
        Ok(Tree {
            id: TreeId(self.conn.last_insert_rowid()),
            name: name.to_string(),
        })
    }

    fn rename_tree(&mut self, id: TreeId, name: &str) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE trees SET name = ?1 WHERE id = ?2",
            params![name, id.0],
        )?;
        if changed == 0 {
            return Err(StorageError::TreeNotFound(id.0));
        }
        Ok(())
    }

    fn delete_tree(&mut self, id: TreeId) -> Result<(), StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM trees WHERE id = ?1", params![id.0])?;
        if changed == 0 {
            return Err(StorageError::TreeNotFound(id.0));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Node operations
    // -------------------------------------------------------------------

    fn get_node(&self, id: NodeId) -> Result<Option<Node>, StorageError> {
        let node = self
            .conn
            .query_row(
                &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1"),
                params![id.0],
                Self::node_from_row,
            )
            .optional()?;
        Ok(node)
    }

    fn get_node_with_children(
        &self,
        id: NodeId,
    ) -> Result<Option<NodeWithChildren>, StorageError> {
        let Some(node) = self.get_node(id)? else {
            return Ok(None);
        };
        let children = self.get_children(id)?;
        Ok(Some(NodeWithChildren { node, children }))
    }

    fn get_children(&self, parent: NodeId) -> Result<Vec<Node>, StorageError> {
        self.query_nodes(
            &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE parent_id = ?1 ORDER BY id"),
            parent.0,
        )
    }

    fn get_root_nodes(&self, tree: TreeId) -> Result<Vec<Node>, StorageError> {
        self.query_nodes(
            &format!(
                "SELECT {NODE_COLUMNS} FROM nodes \
                 WHERE tree_id = ?1 AND parent_id IS NULL ORDER BY id"
            ),
            tree.0,
        )
    }

    fn has_children(&self, id: NodeId) -> Result<bool, StorageError> {
        self.exists("SELECT EXISTS(SELECT 1 FROM nodes WHERE parent_id = ?1)", id.0)
    }

    fn create_node(
        &mut self,
        name: &str,
        tree: TreeId,
        parent: Option<NodeId>,
    ) -> Result<Node, StorageError> {
        self.conn.execute(
            "INSERT INTO nodes (name, parent_id, tree_id) VALUES (?1, ?2, ?3)",
            params![name, parent.map(|p| p.0), tree.0],
        )?;
        Ok(Node {
            id: NodeId(self.conn.last_insert_rowid()),
            name: name.to_string(),
            parent_id: parent,
            tree_id: tree,
        })
    }

    fn update_node(&mut self, node: &Node) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE nodes SET name = ?1, parent_id = ?2 WHERE id = ?3",
            params![node.name, node.parent_id.map(|p| p.0), node.id.0],
        )?;
        if changed == 0 {
            return Err(StorageError::NodeNotFound(node.id.0));
        }
        Ok(())
    }

    fn delete_node(&mut self, id: NodeId) -> Result<(), StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM nodes WHERE id = ?1", params![id.0])?;
        if changed == 0 {
            return Err(StorageError::NodeNotFound(id.0));
        }
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
        // Already inside a transaction: join it.
        if !self.conn.is_autocommit() {
            return op(self);
        }

        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(StorageError::from)?;
        match op(self) {
            Ok(value) => {
                if let Err(err) = self.conn.execute_batch("COMMIT") {
                    self.rollback()?;
                    return Err(StorageError::from(err).into());
                }
                Ok(value)
            }
            Err(err) => {
                self.rollback()?;
                Err(err)
            }
        }
    }
}

impl ExceptionLogStore for SqliteStore {
    fn record_exception(&mut self, entry: &ExceptionLogEntry) -> Result<(), StorageError> {
        let parameters = serde_json::to_string(&entry.parameters)?;
        self.conn.execute(
            "INSERT INTO exception_logs \
             (event_id, timestamp, operation, parameters, error_kind, message) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.event_id,
                entry.timestamp,
                entry.operation,
                parameters,
                entry.error_kind,
                entry.message,
            ],
        )?;
        Ok(())
    }

    fn find_exception(&self, event_id: &str) -> Result<Option<ExceptionLogEntry>, StorageError> {
        let parts = self
            .conn
            .query_row(
                "SELECT event_id, timestamp, operation, parameters, error_kind, message \
                 FROM exception_logs WHERE event_id = ?1",
                params![event_id],
                Self::exception_from_row,
            )
            .optional()?;
        parts.map(Self::exception_from_parts).transpose()
    }

    fn list_exceptions(&self) -> Result<Vec<ExceptionLogEntry>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT event_id, timestamp, operation, parameters, error_kind, message \
             FROM exception_logs ORDER BY id",
        )?;
        let rows = stmt.query_map([], Self::exception_from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(Self::exception_from_parts(row?)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SqliteStore, Tree) {
        let mut store = SqliteStore::in_memory().unwrap();
        let tree = store.create_tree("t").unwrap();
        (store, tree)
    }

    #[test]
    fn create_and_read_tree() {
        let (mut store, tree) = setup();
        assert_eq!(store.get_tree(tree.id).unwrap(), Some(tree.clone()));
        assert!(store.tree_exists(tree.id).unwrap());
        assert!(!store.tree_exists(TreeId(99)).unwrap());

        store.rename_tree(tree.id, "renamed").unwrap();
        assert_eq!(store.get_tree(tree.id).unwrap().unwrap().name, "renamed");
        assert_eq!(store.list_trees().unwrap().len(), 1);
    }

    #[test]
    fn node_queries() {
        let (mut store, tree) = setup();
        let root = store.create_node("root", tree.id, None).unwrap();
        let child = store.create_node("child", tree.id, Some(root.id)).unwrap();

        assert_eq!(store.get_node(child.id).unwrap(), Some(child.clone()));
        assert_eq!(store.get_children(root.id).unwrap(), vec![child.clone()]);
        assert_eq!(store.get_root_nodes(tree.id).unwrap(), vec![root.clone()]);
        assert!(store.has_children(root.id).unwrap());
        assert!(!store.has_children(child.id).unwrap());
        assert!(store.has_nodes(tree.id).unwrap());

        let with_children = store.get_node_with_children(root.id).unwrap().unwrap();
        assert_eq!(with_children.node, root);
        assert_eq!(with_children.children, vec![child]);
        assert!(store.get_node_with_children(NodeId(77)).unwrap().is_none());
    }

    #[test]
    fn update_node_changes_name_and_parent() {
        let (mut store, tree) = setup();
        let a = store.create_node("a", tree.id, None).unwrap();
        let mut b = store.create_node("b", tree.id, None).unwrap();

        b.name = "b2".into();
        b.parent_id = Some(a.id);
        store.update_node(&b).unwrap();

        assert_eq!(store.get_node(b.id).unwrap(), Some(b));
    }

    #[test]
    fn writes_against_missing_rows_fail() {
        let (mut store, _) = setup();
        assert!(matches!(
            store.rename_tree(TreeId(42), "x"),
            Err(StorageError::TreeNotFound(42))
        ));
        assert!(matches!(
            store.delete_node(NodeId(42)),
            Err(StorageError::NodeNotFound(42))
        ));
    }

    #[test]
    fn foreign_keys_refuse_orphans() {
        let (mut store, tree) = setup();
        let root = store.create_node("root", tree.id, None).unwrap();
        store.create_node("child", tree.id, Some(root.id)).unwrap();

        assert!(matches!(
            store.delete_node(root.id),
            Err(StorageError::Sqlite(_))
        ));
        assert!(matches!(
            store.delete_tree(tree.id),
            Err(StorageError::Sqlite(_))
        ));
        assert!(matches!(
            store.create_node("stray", TreeId(500), None),
            Err(StorageError::Sqlite(_))
        ));
    }

    #[test]
    fn node_ids_are_not_reused() {
        let (mut store, tree) = setup();
        let a = store.create_node("a", tree.id, None).unwrap();
        store.delete_node(a.id).unwrap();
        let b = store.create_node("b", tree.id, None).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let (mut store, tree) = setup();

        let result: Result<(), StorageError> = store.atomically(|s| {
            s.create_node("doomed", tree.id, None)?;
            Err(StorageError::IntegrityError {
                reason: "abort".into(),
            })
        });
        assert!(result.is_err());
        assert!(!store.has_nodes(tree.id).unwrap());

        let node = store
            .atomically(|s| s.create_node("kept", tree.id, None))
            .unwrap();
        assert_eq!(store.get_node(node.id).unwrap(), Some(node));
    }

    #[test]
    fn failed_rollback_is_reported() {
        let (mut store, tree) = setup();
        let result: Result<(), StorageError> = store.atomically(|s| {
            s.conn.execute_batch("ROLLBACK")?;
            Err(StorageError::TreeNotFound(tree.id.0))
        });
        assert!(matches!(
            result,
            Err(StorageError::IntegrityError { reason }) if reason.starts_with("rollback failed")
        ));
        assert!(store.conn.is_autocommit());
    }

    #[test]
    fn failed_commit_and_rollback_are_reported() {
        let (mut store, tree) = setup();
        let result: Result<(), StorageError> = store.atomically(|s| {
            s.create_node("lost", tree.id, None)?;
            s.conn.execute_batch("ROLLBACK")?;
            Ok(())
        });
        assert!(matches!(result, Err(StorageError::IntegrityError { .. })));
        assert!(!store.has_nodes(tree.id).unwrap());
    }

    #[test]
    fn nested_transactions_join_the_outer_one() {
        let (mut store, tree) = setup();
        let result: Result<(), StorageError> = store.atomically(|s| {
            s.atomically(|inner| inner.create_node("inner", tree.id, None))?;
            Err(StorageError::IntegrityError {
                reason: "abort".into(),
            })
        });
        assert!(result.is_err());
        assert!(!store.has_nodes(tree.id).unwrap());
    }

    #[test]
    fn exception_log_persists_entries() {
        let (mut store, _) = setup();
        let entry = ExceptionLogEntry {
            event_id: "evt-9".into(),
            timestamp: Utc::now(),
            operation: "move_node".into(),
            parameters: serde_json::json!({ "id": 1, "new_parent_id": 2 }),
            error_kind: "store".into(),
            message: "disk I/O error".into(),
        };
        store.record_exception(&entry).unwrap();

        let found = store.find_exception("evt-9").unwrap().unwrap();
        assert_eq!(found.operation, "move_node");
        assert_eq!(found.parameters, entry.parameters);
        assert_eq!(found.timestamp, entry.timestamp);
        assert!(store.find_exception("missing").unwrap().is_none());
        assert!(store.record_exception(&entry).is_err());
        assert_eq!(store.list_exceptions().unwrap().len(), 1);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.db");
        let path = path.to_str().unwrap();

        let node = {
            let mut store = SqliteStore::new(path).unwrap();
            let tree = store.create_tree("persisted").unwrap();
            store.create_node("n", tree.id, None).unwrap()
        };

        let store = SqliteStore::new(path).unwrap();
        assert_eq!(store.get_node(node.id).unwrap(), Some(node));
    }
}
