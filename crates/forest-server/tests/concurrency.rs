//! Concurrent requests against one shared state.
//!
//! Two opposing moves (A under B, B under A) raced from separate tasks must
//! never both succeed; the forest stays acyclic either way.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use forest_core::NodeId;
use forest_engine::ancestors;
use forest_server::correlation::SequentialGenerator;
use forest_server::router::build_router;
use forest_server::state::AppState;
use forest_storage::SqliteStore;

async fn send(app: Router, method: Method, path: String, body: serde_json::Value) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap().status()
}

async fn created_id(app: &Router, path: &str, body: serde_json::Value) -> i64 {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    json["data"]["id"].as_i64().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opposing_moves_never_both_succeed() {
    for _ in 0..20 {
        let state = AppState::with_store(
            SqliteStore::in_memory().unwrap(),
            Arc::new(SequentialGenerator::new("req")),
        );
        let app = build_router(state.clone());

        let tree = created_id(&app, "/trees", json!({ "name": "T" })).await;
        let a = created_id(&app, "/nodes", json!({ "name": "A", "tree_id": tree })).await;
        let b = created_id(&app, "/nodes", json!({ "name": "B", "tree_id": tree })).await;

        let first = tokio::spawn(send(
            app.clone(),
            Method::PATCH,
            format!("/nodes/{a}/move"),
            json!({ "new_parent_id": b }),
        ));
        let second = tokio::spawn(send(
            app.clone(),
            Method::PATCH,
            format!("/nodes/{b}/move"),
            json!({ "new_parent_id": a }),
        ));
        let statuses = [first.await.unwrap(), second.await.unwrap()];

        let successes = statuses.iter().filter(|s| **s == StatusCode::OK).count();
        assert_eq!(successes, 1, "statuses: {statuses:?}");
        assert!(statuses.contains(&StatusCode::CONFLICT));

        let service = state.service.lock().await;
        for node in [a, b] {
            let chain = ancestors(service.store(), NodeId(node)).expect("acyclic");
            assert!(!chain.contains(&NodeId(node)));
        }
    }
}
