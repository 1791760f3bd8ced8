//! HTTP request handlers for the clone gateway.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use nb_core::{LocalRef, RepoRef, Scheme, SourceReference, UrlRef};
use serde::Serialize;

use crate::error::Result;
use crate::resolvers::ResolveRequest;
use crate::state::AppState;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder backing `GET /metrics`. Safe to call
/// more than once; only the first install wins.
pub fn init_metrics() {
    if let Ok(handle) = PrometheusBuilder::new().install_recorder() {
        let _ = PROMETHEUS.set(handle);
    }
}

/// Presence-only query flags (`?clone`, `?download`).
fn flag(query: &HashMap<String, String>, name: &str) -> bool {
    query.contains_key(name)
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

fn resolve_request(
    source: SourceReference,
    query: &HashMap<String, String>,
    headers: &HeaderMap,
) -> ResolveRequest {
    ResolveRequest {
        source,
        clone_requested: flag(query, "clone"),
        download_requested: flag(query, "download"),
        referer: header_value(headers, header::REFERER),
        host: header_value(headers, header::HOST),
    }
}

async fn resolve_remote(
    state: Arc<AppState>,
    scheme: Scheme,
    host: String,
    tail: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
) -> Result<Response> {
    let url_ref = UrlRef::from_escaped(scheme, &host, &tail);
    let request = resolve_request(SourceReference::Url(url_ref), &query, &headers);
    state.url_resolver.resolve(&state, request).await
}

/// GET /url/{host}/{*remainder}
pub async fn render_http_url(
    State(state): State<Arc<AppState>>,
    Path((host, tail)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    resolve_remote(state, Scheme::Http, host, tail, query, headers).await
}

/// GET /urls/{host}/{*remainder}
pub async fn render_https_url(
    State(state): State<Arc<AppState>>,
    Path((host, tail)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    resolve_remote(state, Scheme::Https, host, tail, query, headers).await
}

/// GET /github/{owner}/{repo}/blob/{revision}/{*path}
pub async fn render_github_blob(
    State(state): State<Arc<AppState>>,
    Path((owner, repo, revision, path)): Path<(String, String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    let source = SourceReference::Repo(RepoRef { owner, repo, revision, path });
    let request = resolve_request(source, &query, &headers);
    state.github_resolver.resolve(&state, request).await
}

async fn resolve_local(
    state: Arc<AppState>,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
) -> Result<Response> {
    // A leading slash would make the join escape the configured root.
    let relative_path = path.trim_start_matches('/').to_string();
    let local_ref = LocalRef {
        absolute_path: state.config.local_root.join(&relative_path),
        relative_path,
    };
    let request = resolve_request(SourceReference::Local(local_ref), &query, &headers);
    state.local_resolver.resolve(&state, request).await
}

/// GET /localfile/{*path}
pub async fn render_local(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    resolve_local(state, path, query, headers).await
}

/// GET /localfile — the configured root itself.
pub async fn render_local_root(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    resolve_local(state, String::new(), query, headers).await
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "healthy".to_string() }))
}

/// Prometheus metrics endpoint.
pub async fn metrics() -> impl IntoResponse {
    let body = PROMETHEUS.get().map(PrometheusHandle::render).unwrap_or_default();
    (StatusCode::OK, body)
}
