//! Route definitions for the clone gateway.

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Creates the Axum router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/url/{host}/{*remainder}", get(handlers::render_http_url))
        .route("/urls/{host}/{*remainder}", get(handlers::render_https_url))
        .route("/github/{owner}/{repo}/blob/{revision}/{*path}", get(handlers::render_github_blob))
        .route("/localfile", get(handlers::render_local_root))
        .route("/localfile/", get(handlers::render_local_root))
        .route("/localfile/{*path}", get(handlers::render_local))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
