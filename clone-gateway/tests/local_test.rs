mod common;

use std::sync::Arc;

use clone_gateway::state::GatewayConfig;
use clone_gateway::visibility::FsVisibility;
use common::{TestGateway, body_string, gateway_with_visibility, get, location, unused_repo_client};
use tempfile::TempDir;
use testing::MockFetcher;

fn local_gateway(dir: &TempDir, clone_notebooks: bool) -> TestGateway {
    let config = GatewayConfig::builder()
        .local_root(dir.path())
        .clone_notebooks(clone_notebooks)
        .build();
    gateway_with_visibility(
        config,
        MockFetcher::new(),
        unused_repo_client(),
        Arc::new(FsVisibility::new(dir.path())),
    )
}

fn populate(dir: &TempDir) {
    std::fs::create_dir(dir.path().join("beta")).unwrap();
    std::fs::create_dir(dir.path().join("alpha")).unwrap();
    std::fs::write(dir.path().join("z.ipynb"), "{\"cells\": []}").unwrap();
    std::fs::write(dir.path().join("a.ipynb"), "{\"cells\": []}").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a notebook").unwrap();
    std::fs::write(dir.path().join(".hidden.ipynb"), "{}").unwrap();
}

#[tokio::test]
async fn listing_is_directories_then_notebooks_sorted() {
    let dir = TempDir::new().unwrap();
    populate(&dir);
    let gw = local_gateway(&dir, false);

    let response = get(&gw, "/localfile").await;

    assert_eq!(response.status(), 200);
    // Plain files and hidden entries never appear.
    assert_eq!(body_string(response).await, "listing alpha,beta,a.ipynb,z.ipynb");

    let views = gw.renderer.rendered_views();
    assert_eq!(views.len(), 1);
    assert!(!views[0].clone_enabled);
}

#[tokio::test]
async fn subdirectory_listing_builds_entry_urls() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub/a.ipynb"), "{}").unwrap();
    let gw = local_gateway(&dir, true);

    let response = get(&gw, "/localfile/sub").await;

    assert_eq!(response.status(), 200);
    let views = gw.renderer.rendered_views();
    assert_eq!(views[0].listing.entries[0].url, "/localfile/sub/a.ipynb");
    assert_eq!(views[0].title, "sub/");
    assert!(views[0].clone_enabled);
}

#[tokio::test]
async fn download_flag_streams_the_raw_file() {
    let dir = TempDir::new().unwrap();
    populate(&dir);
    let gw = local_gateway(&dir, false);

    let response = get(&gw, "/localfile/a.ipynb?download").await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/octet-stream");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"a.ipynb\""
    );
    assert_eq!(body_string(response).await, "{\"cells\": []}");
}

#[tokio::test]
async fn clone_redirect_carries_the_absolute_path() {
    let dir = TempDir::new().unwrap();
    populate(&dir);
    let gw = local_gateway(&dir, true);

    let response = get(&gw, "/localfile/a.ipynb?clone").await;

    assert!(response.status().is_redirection());
    let absolute = dir.path().join("a.ipynb");
    let expected = format!(
        "/user-redirect/local_clone?clone_from={}",
        urlencoding::encode(&absolute.to_string_lossy())
    );
    assert_eq!(location(&response), expected);
}

#[tokio::test]
async fn clone_flag_is_ignored_when_cloning_is_disabled() {
    let dir = TempDir::new().unwrap();
    populate(&dir);
    let gw = local_gateway(&dir, false);

    let response = get(&gw, "/localfile/a.ipynb?clone").await;

    assert_eq!(response.status(), 200);
    assert!(body_string(response).await.contains("download=?download"));
}

#[tokio::test]
async fn notebooks_render_non_public_with_breadcrumbs() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub/nb.ipynb"), "{\"cells\": []}").unwrap();
    let gw = local_gateway(&dir, false);

    let response = get(&gw, "/localfile/sub/nb.ipynb").await;

    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("public=false"));
    assert!(body.contains("title=nb.ipynb"));

    let pages = gw.renderer.rendered_pages();
    assert_eq!(pages[0].download_url, "?download");
    let crumbs: Vec<&str> = pages[0].breadcrumbs.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(crumbs, ["/localfile/sub", "/localfile/sub/nb.ipynb"]);
}

#[tokio::test]
async fn hidden_files_are_not_found() {
    let dir = TempDir::new().unwrap();
    populate(&dir);
    let gw = local_gateway(&dir, false);

    let response = get(&gw, "/localfile/.hidden.ipynb").await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn missing_files_are_not_found() {
    let dir = TempDir::new().unwrap();
    let gw = local_gateway(&dir, false);

    let response = get(&gw, "/localfile/absent.ipynb").await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn parent_traversal_is_not_found() {
    let dir = TempDir::new().unwrap();
    populate(&dir);
    let gw = local_gateway(&dir, false);

    let response = get(&gw, "/localfile/%2e%2e%2fetc%2fpasswd").await;

    assert_eq!(response.status(), 404);
}
