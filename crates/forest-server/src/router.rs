//! Router assembly for the forest HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Trees
        .route(
            "/trees",
            get(handlers::trees::list_trees).post(handlers::trees::create_tree),
        )
        .route(
            "/trees/{id}",
            get(handlers::trees::get_tree)
                .put(handlers::trees::rename_tree)
                .delete(handlers::trees::delete_tree),
        )
        // Nodes
        .route("/nodes", post(handlers::nodes::create_node))
        .route(
            "/nodes/tree/{tree_id}",
            get(handlers::nodes::list_root_nodes),
        )
        .route(
            "/nodes/{id}",
            get(handlers::nodes::get_node)
                .put(handlers::nodes::update_node)
                .delete(handlers::nodes::delete_node),
        )
        .route("/nodes/{id}/children", get(handlers::nodes::get_children))
        .route("/nodes/{id}/move", patch(handlers::nodes::move_node))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
