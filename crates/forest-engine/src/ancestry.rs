//! Upward reachability over stored parent pointers.
//!
//! Both walks are loops with a visited set. A forest the engine maintains
//! never contains a cycle, but if the stored data does, the walk reports
//! [`StorageError::IntegrityError`] instead of spinning forever.

use std::collections::HashSet;

use forest_core::NodeId;
use forest_storage::{ForestStore, StorageError};

/// Returns true if `ancestor` lies on the parent chain of `candidate`.
///
/// Only proper ancestry is tested: the walk starts at `candidate`'s parent,
/// so `is_descendant(n, n)` is false unless the data is already cyclic.
/// An unknown `candidate` (or a dangling parent pointer on the way up) ends
/// the walk with `false`.
pub fn is_descendant<S: ForestStore + ?Sized>(
    store: &S,
    ancestor: NodeId,
    candidate: NodeId,
) -> Result<bool, StorageError> {
    let mut visited = HashSet::new();
    let mut current = candidate;

    loop {
        if !visited.insert(current) {
            return Err(cycle_error(current));
        }
        let Some(node) = store.get_node(current)? else {
            return Ok(false);
        };
        match node.parent_id {
            Some(parent) if parent == ancestor => return Ok(true),
            Some(parent) => current = parent,
            None => return Ok(false),
        }
    }
}

/// Returns the ids on the path from `node`'s parent up to its root.
///
/// Empty for a root node or an unknown id.
pub fn ancestors<S: ForestStore + ?Sized>(
    store: &S,
    node: NodeId,
) -> Result<Vec<NodeId>, StorageError> {
    let mut path = Vec::new();
    let mut visited = HashSet::from([node]);
    let mut next = store.get_node(node)?.and_then(|n| n.parent_id);

    while let Some(id) = next {
        if !visited.insert(id) {
            return Err(cycle_error(id));
        }
        path.push(id);
        next = store.get_node(id)?.and_then(|n| n.parent_id);
    }
    Ok(path)
}

fn cycle_error(node: NodeId) -> StorageError {
    StorageError::IntegrityError {
        reason: format!("parent chain through node {} is cyclic", node),
    }
}
