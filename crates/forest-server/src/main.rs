//! Binary entrypoint for the forest HTTP server.
//!
//! Configuration comes from environment variables, see
//! [`ServerConfig`](forest_server::config::ServerConfig). Log filtering
//! follows `RUST_LOG` (default: "info").

use forest_server::config::ServerConfig;
use forest_server::router::build_router;
use forest_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Failed to read server configuration");

    let state = AppState::new(&config.db_path)
        .expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = config.addr();
    tracing::info!(db = %config.db_path, "forest server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
