use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use clone_gateway::routes::create_router;
use clone_gateway::state::{AppState, GatewayConfig};
use nb_core::VisibilityPredicate;
use testing::{MockFetcher, MockRenderPipeline, MockRepositoryClient, StaticVisibility};
use tower::ServiceExt;

/// A gateway wired to mocks, with typed handles kept around so tests
/// can assert on recorded collaborator calls.
pub struct TestGateway {
    pub fetcher: Arc<MockFetcher>,
    pub repo_client: Arc<MockRepositoryClient>,
    pub renderer: Arc<MockRenderPipeline>,
    pub state: Arc<AppState>,
}

pub fn gateway(config: GatewayConfig, fetcher: MockFetcher, repo_client: MockRepositoryClient) -> TestGateway {
    gateway_with_visibility(config, fetcher, repo_client, Arc::new(StaticVisibility(true)))
}

pub fn gateway_with_visibility(
    config: GatewayConfig,
    fetcher: MockFetcher,
    repo_client: MockRepositoryClient,
    visibility: Arc<dyn VisibilityPredicate>,
) -> TestGateway {
    let fetcher = Arc::new(fetcher);
    let repo_client = Arc::new(repo_client);
    let renderer = Arc::new(MockRenderPipeline::new());
    let state = Arc::new(AppState::with_collaborators(
        config,
        fetcher.clone(),
        repo_client.clone(),
        renderer.clone(),
        visibility,
    ));
    TestGateway { fetcher, repo_client, renderer, state }
}

/// Repository client double for tests that must not touch it.
pub fn unused_repo_client() -> MockRepositoryClient {
    MockRepositoryClient::with_api_error(500, "unscripted repository call")
}

pub async fn get(gateway: &TestGateway, uri: &str) -> Response<Body> {
    get_with_headers(gateway, uri, &[]).await
}

pub async fn get_with_headers(
    gateway: &TestGateway,
    uri: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    create_router(gateway.state.clone())
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[axum::http::header::LOCATION].to_str().unwrap()
}
