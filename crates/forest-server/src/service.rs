//! ForestService: the single coordinator between HTTP handlers and the
//! hierarchy engine, tree registry and store.
//!
//! Handlers are thin wrappers around these methods. Every failed mutation
//! goes through [`ForestService::reject`], which assigns a correlation id,
//! logs the failure, writes a durable exception record, and converts the
//! error into its transport form.

use std::sync::Arc;

use chrono::Utc;
use forest_core::{Node, NodeId, NodeWithChildren, Tree, TreeId};
use forest_engine::{EngineError, ErrorKind, HierarchyEngine, NodeUpdate, TreeRegistry};
use forest_storage::{ExceptionLogEntry, ExceptionLogStore, ForestStore};
use serde::Serialize;

use crate::correlation::CorrelationIdGenerator;
use crate::error::ApiError;
use crate::schema::nodes::{CreateNodeRequest, MoveNodeRequest, UpdateNodeRequest};
use crate::schema::trees::TreeDetailView;

/// The central service wrapping one store.
pub struct ForestService<S> {
    store: S,
    ids: Arc<dyn CorrelationIdGenerator>,
}

impl<S: ForestStore + ExceptionLogStore> ForestService<S> {
    pub fn new(store: S, ids: Arc<dyn CorrelationIdGenerator>) -> Self {
        ForestService { store, ids }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocates a fresh correlation id for a successful response.
    pub fn correlation_id(&self) -> String {
        self.ids.next_id()
    }

    // -------------------------------------------------------------------
    // Trees
    // -------------------------------------------------------------------

    pub fn list_trees(&mut self) -> Result<Vec<Tree>, ApiError> {
        TreeRegistry::new(&mut self.store)
            .list_trees()
            .map_err(|err| self.reject("list_trees", &(), err))
    }

    /// Loads a tree with its root nodes; a missing tree is `NotFound`.
    pub fn get_tree(&mut self, id: TreeId) -> Result<TreeDetailView, ApiError> {
        let loaded = (|| -> Result<Option<(Tree, Vec<Node>)>, EngineError> {
            let Some(tree) = TreeRegistry::new(&mut self.store).get_tree(id)? else {
                return Ok(None);
            };
            let roots = HierarchyEngine::new(&mut self.store).get_root_nodes(id)?;
            Ok(Some((tree, roots)))
        })();

        match loaded {
            Ok(Some((tree, roots))) => Ok(TreeDetailView {
                id: tree.id,
                name: tree.name,
                root_nodes: roots.into_iter().map(Into::into).collect(),
            }),
            Ok(None) => Err(self.not_found(EngineError::TreeNotFound(id))),
            Err(err) => Err(self.reject("get_tree", &id, err)),
        }
    }

    pub fn create_tree(&mut self, name: &str) -> Result<Tree, ApiError> {
        TreeRegistry::new(&mut self.store)
            .create_tree(name)
            .map_err(|err| self.reject("create_tree", &Params::name(name), err))
    }

    pub fn rename_tree(&mut self, id: TreeId, name: &str) -> Result<Tree, ApiError> {
        TreeRegistry::new(&mut self.store)
            .rename_tree(id, name)
            .map_err(|err| self.reject("rename_tree", &Params::tree(id, name), err))
    }

    pub fn delete_tree(&mut self, id: TreeId) -> Result<(), ApiError> {
        TreeRegistry::new(&mut self.store)
            .delete_tree(id)
            .map_err(|err| self.reject("delete_tree", &id, err))
    }

    // -------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------

    pub fn get_root_nodes(&mut self, tree: TreeId) -> Result<Vec<Node>, ApiError> {
        HierarchyEngine::new(&mut self.store)
            .get_root_nodes(tree)
            .map_err(|err| self.reject("get_root_nodes", &tree, err))
    }

    /// Loads a node with its children; a missing node is `NotFound`.
    pub fn get_node(&mut self, id: NodeId) -> Result<NodeWithChildren, ApiError> {
        match HierarchyEngine::new(&mut self.store).get_node(id) {
            Ok(Some(node)) => Ok(node),
            Ok(None) => Err(self.not_found(EngineError::NodeNotFound(id))),
            Err(err) => Err(self.reject("get_node", &id, err)),
        }
    }

    pub fn get_children(&mut self, id: NodeId) -> Result<Vec<Node>, ApiError> {
        HierarchyEngine::new(&mut self.store)
            .get_children(id)
            .map_err(|err| self.reject("get_children", &id, err))
    }

    pub fn create_node(&mut self, req: &CreateNodeRequest) -> Result<Node, ApiError> {
        HierarchyEngine::new(&mut self.store)
            .create_node(&req.name, req.tree_id, req.parent_id)
            .map_err(|err| self.reject("create_node", req, err))
    }

    pub fn update_node(&mut self, id: NodeId, req: &UpdateNodeRequest) -> Result<Node, ApiError> {
        let update = NodeUpdate {
            name: req.name.clone(),
            parent_id: req.parent_id,
            tree_id: req.tree_id,
        };
        HierarchyEngine::new(&mut self.store)
            .update_node(id, update)
            .map_err(|err| self.reject("update_node", &Params::with_id(id, req), err))
    }

    pub fn move_node(&mut self, id: NodeId, req: &MoveNodeRequest) -> Result<Node, ApiError> {
        HierarchyEngine::new(&mut self.store)
            .move_node(id, req.new_parent_id)
            .map_err(|err| self.reject("move_node", &Params::with_id(id, req), err))
    }

    pub fn delete_node(&mut self, id: NodeId) -> Result<(), ApiError> {
        HierarchyEngine::new(&mut self.store)
            .delete_node(id)
            .map_err(|err| self.reject("delete_node", &id, err))
    }

    // -------------------------------------------------------------------
    // Failure handling
    // -------------------------------------------------------------------

    /// Records a failed operation and converts it for the transport.
    fn reject<P: Serialize + ?Sized>(
        &mut self,
        operation: &str,
        parameters: &P,
        err: EngineError,
    ) -> ApiError {
        let event_id = self.ids.next_id();
        let kind = err.kind();

        match kind {
            ErrorKind::Store => {
                tracing::error!(%event_id, operation, error = %err, "store failure");
            }
            ErrorKind::Reference | ErrorKind::Constraint => {
                tracing::warn!(%event_id, operation, error = %err, "operation rejected");
            }
        }

        let entry = ExceptionLogEntry {
            event_id: event_id.clone(),
            timestamp: Utc::now(),
            operation: operation.to_string(),
            parameters: serde_json::to_value(parameters).unwrap_or(serde_json::Value::Null),
            error_kind: kind.as_str().to_string(),
            message: err.to_string(),
        };
        if let Err(log_err) = self.store.record_exception(&entry) {
            tracing::error!(%event_id, error = %log_err, "failed to record exception");
        }

        ApiError::from_engine(event_id, &err)
    }

    /// Absence on a read: reported to the caller, not recorded.
    fn not_found(&self, err: EngineError) -> ApiError {
        ApiError::from_engine(self.ids.next_id(), &err)
    }
}

/// Ad-hoc parameter shapes for the exception log.
#[derive(Serialize)]
struct Params<'a, T: Serialize + ?Sized> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(flatten)]
    body: Option<&'a T>,
}

impl<'a> Params<'a, ()> {
    fn name(name: &'a str) -> Self {
        Params {
            id: None,
            name: Some(name),
            body: None,
        }
    }

    fn tree(id: TreeId, name: &'a str) -> Self {
        Params {
            id: Some(id.0),
            name: Some(name),
            body: None,
        }
    }
}

impl<'a, T: Serialize> Params<'a, T> {
    fn with_id(id: NodeId, body: &'a T) -> Self {
        Params {
            id: Some(id.0),
            name: None,
            body: Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::SequentialGenerator;
    use forest_storage::InMemoryStore;

    fn service() -> ForestService<InMemoryStore> {
        ForestService::new(
            InMemoryStore::new(),
            Arc::new(SequentialGenerator::new("t")),
        )
    }

    #[test]
    fn rejected_move_is_recorded_with_its_parameters() {
        let mut service = service();
        let tree = service.create_tree("t").unwrap();
        let a = service
            .create_node(&CreateNodeRequest {
                name: "a".into(),
                tree_id: tree.id,
                parent_id: None,
            })
            .unwrap();

        let err = service
            .move_node(
                a.id,
                &MoveNodeRequest {
                    new_parent_id: Some(a.id),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));

        let entry = service
            .store()
            .find_exception(err.correlation_id())
            .unwrap()
            .unwrap();
        assert_eq!(entry.operation, "move_node");
        assert_eq!(entry.error_kind, "constraint");
        assert_eq!(
            entry.parameters,
            serde_json::json!({ "id": a.id.0, "new_parent_id": a.id.0 })
        );
    }

    #[test]
    fn missing_reads_are_not_found_but_not_recorded() {
        let mut service = service();
        assert!(matches!(
            service.get_node(NodeId(9)),
            Err(ApiError::NotFound { .. })
        ));
        assert!(matches!(
            service.get_tree(TreeId(9)),
            Err(ApiError::NotFound { .. })
        ));
        assert!(service.store().list_exceptions().unwrap().is_empty());
    }

    #[test]
    fn get_tree_includes_root_nodes() {
        let mut service = service();
        let tree = service.create_tree("t").unwrap();
        let root = service
            .create_node(&CreateNodeRequest {
                name: "root".into(),
                tree_id: tree.id,
                parent_id: None,
            })
            .unwrap();
        service
            .create_node(&CreateNodeRequest {
                name: "child".into(),
                tree_id: tree.id,
                parent_id: Some(root.id),
            })
            .unwrap();

        let detail = service.get_tree(tree.id).unwrap();
        assert_eq!(detail.root_nodes.len(), 1);
        assert_eq!(detail.root_nodes[0].id, root.id);
    }

    #[test]
    fn store_failure_is_opaque_and_recorded_in_full() {
        let mut service = service();
        let tree = service.create_tree("t").unwrap();
        let node = |service: &mut ForestService<InMemoryStore>, name: &str| {
            service
                .create_node(&CreateNodeRequest {
                    name: name.into(),
                    tree_id: tree.id,
                    parent_id: None,
                })
                .unwrap()
        };
        let mut a = node(&mut service, "a");
        let mut b = node(&mut service, "b");
        let c = node(&mut service, "c");

        // a <-> b, bypassing the engine.
        b.parent_id = Some(a.id);
        service.store.update_node(&b).unwrap();
        a.parent_id = Some(b.id);
        service.store.update_node(&a).unwrap();

        let err = service
            .move_node(
                c.id,
                &MoveNodeRequest {
                    new_parent_id: Some(b.id),
                },
            )
            .unwrap_err();
        assert!(matches!(&err, ApiError::Internal { .. }));

        let entry = service
            .store()
            .find_exception(err.correlation_id())
            .unwrap()
            .unwrap();
        assert_eq!(entry.error_kind, "store");
        assert_eq!(entry.operation, "move_node");
        assert!(entry.message.contains("is cyclic"), "{}", entry.message);
        assert!(!err.to_string().contains("cyclic"));
        assert_eq!(service.store().get_node(c.id).unwrap().unwrap().parent_id, None);
    }

    #[test]
    fn each_failure_gets_its_own_id() {
        let mut service = service();
        let first = service.delete_tree(TreeId(1)).unwrap_err();
        let second = service.delete_tree(TreeId(1)).unwrap_err();
        assert_ne!(first.correlation_id(), second.correlation_id());
        assert_eq!(service.store().list_exceptions().unwrap().len(), 2);
    }
}
