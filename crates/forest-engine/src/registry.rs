//! Tree mutations and reads.

use forest_core::{Tree, TreeId};
use forest_storage::ForestStore;

use crate::error::EngineError;
use crate::validate::{require_tree, validate_name};

/// Validating front end for tree operations.
///
/// The one invariant it guards: a tree that still owns nodes is never
/// deleted.
pub struct TreeRegistry<'s, S: ForestStore> {
    store: &'s mut S,
}

impl<'s, S: ForestStore> TreeRegistry<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        TreeRegistry { store }
    }

    /// Creates an empty tree.
    pub fn create_tree(&mut self, name: &str) -> Result<Tree, EngineError> {
        validate_name(name)?;
        let tree = self.store.create_tree(name)?;
        tracing::info!(tree = %tree.id, name, "tree created");
        Ok(tree)
    }

    pub fn rename_tree(&mut self, id: TreeId, name: &str) -> Result<Tree, EngineError> {
        let tree = self.store.atomically(|store| -> Result<Tree, EngineError> {
            let mut tree = require_tree(store, id)?;
            validate_name(name)?;
            store.rename_tree(id, name)?;
            tree.name = name.to_string();
            Ok(tree)
        })?;
        tracing::info!(tree = %id, name, "tree renamed");
        Ok(tree)
    }

    /// Deletes a tree that owns no nodes.
    pub fn delete_tree(&mut self, id: TreeId) -> Result<(), EngineError> {
        self.store.atomically(|store| -> Result<(), EngineError> {
            require_tree(store, id)?;
            if store.has_nodes(id)? {
                tracing::warn!(tree = %id, "cannot delete tree that still has nodes");
                return Err(EngineError::TreeHasNodes(id));
            }
            Ok(store.delete_tree(id)?)
        })?;
        tracing::info!(tree = %id, "tree deleted");
        Ok(())
    }

    pub fn get_tree(&self, id: TreeId) -> Result<Option<Tree>, EngineError> {
        Ok(self.store.get_tree(id)?)
    }

    /// All trees, ordered by id.
    pub fn list_trees(&self) -> Result<Vec<Tree>, EngineError> {
        Ok(self.store.list_trees()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use forest_storage::InMemoryStore;

    #[test]
    fn create_rename_list() {
        let mut store = InMemoryStore::new();
        let mut registry = TreeRegistry::new(&mut store);

        let tree = registry.create_tree("first").unwrap();
        registry.create_tree("second").unwrap();
        let renamed = registry.rename_tree(tree.id, "renamed").unwrap();

        assert_eq!(renamed.name, "renamed");
        assert_eq!(registry.get_tree(tree.id).unwrap(), Some(renamed));
        let names: Vec<String> = registry
            .list_trees()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["renamed", "second"]);
    }

    #[test]
    fn unknown_tree_is_a_reference_error() {
        let mut store = InMemoryStore::new();
        let mut registry = TreeRegistry::new(&mut store);

        let err = registry.rename_tree(TreeId(3), "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        let err = registry.delete_tree(TreeId(3)).unwrap_err();
        assert!(matches!(err, EngineError::TreeNotFound(TreeId(3))));
        assert!(registry.get_tree(TreeId(3)).unwrap().is_none());
    }

    #[test]
    fn delete_requires_empty_tree() {
        let mut store = InMemoryStore::new();
        let tree = store.create_tree("t").unwrap();
        let node = store.create_node("n", tree.id, None).unwrap();

        let mut registry = TreeRegistry::new(&mut store);
        let err = registry.delete_tree(tree.id).unwrap_err();
        assert!(matches!(err, EngineError::TreeHasNodes(_)));
        assert_eq!(err.kind(), ErrorKind::Constraint);
        drop(registry);

        store.delete_node(node.id).unwrap();
        TreeRegistry::new(&mut store).delete_tree(tree.id).unwrap();
        assert!(!store.tree_exists(tree.id).unwrap());
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut store = InMemoryStore::new();
        let mut registry = TreeRegistry::new(&mut store);
        assert!(matches!(
            registry.create_tree(""),
            Err(EngineError::InvalidName)
        ));
        let tree = registry.create_tree("t").unwrap();
        assert!(matches!(
            registry.rename_tree(tree.id, " "),
            Err(EngineError::InvalidName)
        ));
    }
}
