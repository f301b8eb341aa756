//! Tree handlers (list, get, create, rename, delete).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forest_core::TreeId;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::trees::{CreateTreeRequest, RenameTreeRequest, TreeDetailView, TreeView};
use crate::state::AppState;

/// `GET /trees`
pub async fn list_trees(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TreeView>>>, ApiError> {
    let mut service = state.service.lock().await;
    let trees = service.list_trees()?;
    let views: Vec<TreeView> = trees.into_iter().map(TreeView::from).collect();
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        format!("{} trees", views.len()),
        views,
    )))
}

/// Returns the tree with its root nodes.
///
/// `GET /trees/{id}`
pub async fn get_tree(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TreeDetailView>>, ApiError> {
    let mut service = state.service.lock().await;
    let detail = service.get_tree(TreeId(id))?;
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        "tree loaded",
        detail,
    )))
}

/// `POST /trees`
pub async fn create_tree(
    State(state): State<AppState>,
    Json(req): Json<CreateTreeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TreeView>>), ApiError> {
    let mut service = state.service.lock().await;
    let tree = service.create_tree(&req.name)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            service.correlation_id(),
            "tree created",
            TreeView::from(tree),
        )),
    ))
}

/// `PUT /trees/{id}`
pub async fn rename_tree(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<RenameTreeRequest>,
) -> Result<Json<ApiResponse<TreeView>>, ApiError> {
    let mut service = state.service.lock().await;
    let tree = service.rename_tree(TreeId(id), &req.name)?;
    Ok(Json(ApiResponse::ok(
        service.correlation_id(),
        "tree renamed",
        TreeView::from(tree),
    )))
}

/// Refused while the tree still has nodes.
///
/// `DELETE /trees/{id}`
pub async fn delete_tree(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_tree(TreeId(id))?;
    Ok(Json(ApiResponse::done(
        service.correlation_id(),
        format!("tree {} deleted", id),
    )))
}
