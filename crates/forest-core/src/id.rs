//! Stable ID newtypes for forest entities.
//!
//! Both IDs wrap `i64` so they line up with SQLite's `INTEGER PRIMARY KEY`,
//! while staying distinct types: a `TreeId` cannot be passed where a `NodeId`
//! is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tree identity. Allocated by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(pub i64);

/// Node identity. Allocated by the store on creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_id_display() {
        assert_eq!(format!("{}", TreeId(7)), "7");
    }

    #[test]
    fn node_id_display() {
        assert_eq!(format!("{}", NodeId(42)), "42");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&NodeId(5)).unwrap(), "5");
        let tree: TreeId = serde_json::from_str("12").unwrap();
        assert_eq!(tree, TreeId(12));
    }

    #[test]
    fn ids_order_by_inner_value() {
        let mut ids = vec![NodeId(3), NodeId(1), NodeId(2)];
        ids.sort();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }
}
