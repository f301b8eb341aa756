//! Node handlers: reads, create, update, move, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forest_core::{NodeId, TreeId};

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::nodes::{CreateNodeRequest, MoveNodeRequest, NodeView, UpdateNodeRequest};
use crate::state::AppState;

fn views(nodes: Vec<forest_core::Node>) -> Vec<NodeView> {
    nodes.into_iter().map(NodeView::from).collect()
}

/// Root nodes of a tree.
///
/// `GET /nodes/tree/{tree_id}`
pub async fn list_root_nodes(
    State(state): State<AppState>,
    Path(tree_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<NodeView>>>, ApiError> {
    let mut service = state.service.lock().await;
    let roots = views(service.get_root_nodes(TreeId(tree_id))?);
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        format!("{} root nodes", roots.len()),
        roots,
    )))
}

/// A node with its direct children.
///
/// `GET /nodes/{id}`
pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<NodeView>>, ApiError> {
    let mut service = state.service.lock().await;
    let node = service.get_node(NodeId(id))?;
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        "node loaded",
        NodeView::from(node),
    )))
}

/// `GET /nodes/{id}/children`
pub async fn get_children(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<NodeView>>>, ApiError> {
    let mut service = state.service.lock().await;
    let children = views(service.get_children(NodeId(id))?);
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        format!("{} children", children.len()),
        children,
    )))
}

/// `POST /nodes`
pub async fn create_node(
    State(state): State<AppState>,
    Json(req): Json<CreateNodeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NodeView>>), ApiError> {
    let mut service = state.service.lock().await;
    let node = service.create_node(&req)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            service.correlation_id(),
            "node created",
            NodeView::from(node),
        )),
    ))
}

/// Replaces name and parent in one step.
///
/// `PUT /nodes/{id}`
pub async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateNodeRequest>,
) -> Result<Json<ApiResponse<NodeView>>, ApiError> {
    let mut service = state.service.lock().await;
    let node = service.update_node(NodeId(id), &req)?;
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        "node updated",
        NodeView::from(node),
    )))
}

/// `PATCH /nodes/{id}/move`
pub async fn move_node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MoveNodeRequest>,
) -> Result<Json<ApiResponse<NodeView>>, ApiError> {
    let mut service = state.service.lock().await;
    let node = service.move_node(NodeId(id), &req)?;
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        "node moved",
        NodeView::from(node),
    )))
}

/// Refused while the node has children.
///
/// `DELETE /nodes/{id}`
pub async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_node(NodeId(id))?;
    Ok(Json(ApiResponse::done(
        service.correlation_id(),
        format!("node {} deleted", id),
    )))
}
