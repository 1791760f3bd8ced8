mod common;

use clone_gateway::state::GatewayConfig;
use common::{body_string, gateway, get, get_with_headers, location, unused_repo_client};
use testing::MockFetcher;

const ROBOTS: &str = "http://example.com/robots.txt";
const ROBOTS_TLS: &str = "https://example.com/robots.txt";

#[tokio::test]
async fn referred_non_notebook_link_passes_through_without_fetching() {
    let gw = gateway(GatewayConfig::default(), MockFetcher::new(), unused_repo_client());

    let response = get_with_headers(
        &gw,
        "/url/example.com/files/data.csv",
        &[("host", "nb.example.org"), ("referer", "http://nb.example.org/url/example.com/a.ipynb")],
    )
    .await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "http://example.com/files/data.csv");
    assert!(gw.fetcher.fetched_urls().is_empty());
}

#[tokio::test]
async fn referer_from_elsewhere_does_not_trigger_passthrough() {
    let fetcher = MockFetcher::new()
        .with_status_error(ROBOTS, 404)
        .with_body("http://example.com/files/data.csv", "plain text");
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    let response = get_with_headers(
        &gw,
        "/url/example.com/files/data.csv",
        &[("host", "nb.example.org"), ("referer", "http://other.org/page")],
    )
    .await;

    assert_eq!(response.status(), 200);
    assert!(gw.fetcher.fetched_urls().contains(&"http://example.com/files/data.csv".to_string()));
}

#[tokio::test]
async fn clone_redirect_skips_notebook_fetch() {
    let config = GatewayConfig::builder().clone_notebooks(true).build();
    let fetcher = MockFetcher::new().with_status_error(ROBOTS_TLS, 404);
    let gw = gateway(config, fetcher, unused_repo_client());

    let response = get(&gw, "/urls/example.com/nb.ipynb?clone").await;

    assert!(response.status().is_redirection());
    assert_eq!(
        location(&response),
        "/user-redirect/url_clone?clone_from=example.com%2Fnb.ipynb&protocol=https"
    );
    // Only the robots.txt probe went out; the notebook itself was never
    // fetched.
    assert_eq!(gw.fetcher.fetched_urls(), vec![ROBOTS_TLS.to_string()]);
}

#[tokio::test]
async fn clone_flag_is_ignored_when_cloning_is_disabled() {
    let fetcher = MockFetcher::new()
        .with_status_error(ROBOTS, 404)
        .with_body("http://example.com/nb.ipynb", "{\"cells\": []}");
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    let response = get(&gw, "/url/example.com/nb.ipynb?clone").await;

    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("download=http://example.com/nb.ipynb"));
}

#[tokio::test]
async fn missing_robots_renders_public() {
    let fetcher = MockFetcher::new()
        .with_status_error(ROBOTS, 404)
        .with_body("http://example.com/nb.ipynb", "{\"cells\": []}");
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    let response = get(&gw, "/url/example.com/nb.ipynb").await;

    assert_eq!(response.status(), 200);
    assert!(body_string(response).await.contains("public=true"));
}

#[tokio::test]
async fn disallowing_robots_renders_non_public() {
    let fetcher = MockFetcher::new()
        .with_body(ROBOTS, "User-agent: *\nDisallow: /\n")
        .with_body("http://example.com/nb.ipynb", "{\"cells\": []}");
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    let response = get(&gw, "/url/example.com/nb.ipynb").await;

    assert_eq!(response.status(), 200);
    assert!(body_string(response).await.contains("public=false"));
}

#[tokio::test]
async fn undecodable_robots_renders_non_public() {
    let fetcher = MockFetcher::new()
        .with_body(ROBOTS, vec![0xff, 0xfe, 0x00])
        .with_body("http://example.com/nb.ipynb", "{\"cells\": []}");
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    let response = get(&gw, "/url/example.com/nb.ipynb").await;

    assert_eq!(response.status(), 200);
    assert!(body_string(response).await.contains("public=false"));
}

#[tokio::test]
async fn non_utf8_notebook_is_a_bad_request() {
    let fetcher = MockFetcher::new()
        .with_status_error(ROBOTS, 404)
        .with_body("http://example.com/nb.ipynb", vec![0xff, 0xfe]);
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    let response = get(&gw, "/url/example.com/nb.ipynb").await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn embedded_query_is_carried_to_the_remote_url() {
    let fetcher = MockFetcher::new()
        .with_status_error(ROBOTS, 404)
        .with_body("http://example.com/nb.ipynb?a=1", "{\"cells\": []}");
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    // The remote query arrives embedded in the path after a literal
    // `/?` separator.
    let response = get(&gw, "/url/example.com/nb.ipynb/%3Fa=1").await;

    assert_eq!(response.status(), 200);
    assert!(body_string(response).await.contains("download=http://example.com/nb.ipynb?a=1"));
}

#[tokio::test]
async fn remote_fetch_failure_is_a_server_error() {
    let fetcher = MockFetcher::new()
        .with_status_error(ROBOTS, 404)
        .with_connect_error("http://example.com/nb.ipynb");
    let gw = gateway(GatewayConfig::default(), fetcher, unused_repo_client());

    let response = get(&gw, "/url/example.com/nb.ipynb").await;

    assert_eq!(response.status(), 500);
}
