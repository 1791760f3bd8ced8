//! Resolver for externally hosted notebooks addressed by URL.

use async_trait::async_trait;
use axum::response::{Html, IntoResponse, Redirect, Response};
use nb_core::{NotebookPage, SourceReference, is_notebook_path};

use crate::error::{GatewayError, Result};
use crate::robots::crawl_visibility;
use crate::state::AppState;

use super::{NotebookSourceResolver, ResolveRequest, clone_intent};

pub struct RemoteUrlResolver;

/// Relative asset links (`files/` URLs) inside a rendered notebook
/// arrive as non-notebook paths referred from one of our own `/url`
/// pages; they go back to the origin untouched.
fn referred_from_rendered_page(request: &ResolveRequest) -> bool {
    let (Some(referer), Some(host)) = (&request.referer, &request.host) else {
        return false;
    };
    let referer = referer.split("://").next_back().unwrap_or(referer);
    referer.starts_with(&format!("{host}/url"))
}

#[async_trait]
impl NotebookSourceResolver for RemoteUrlResolver {
    fn provider(&self) -> &'static str {
        "url"
    }

    async fn resolve(&self, state: &AppState, request: ResolveRequest) -> Result<Response> {
        let SourceReference::Url(url_ref) = &request.source else {
            return Err(GatewayError::Internal("URL resolver got a non-URL source".into()));
        };
        let remote_url = url_ref.absolute_url();

        if !is_notebook_path(&url_ref.path) && referred_from_rendered_page(&request) {
            tracing::debug!(%remote_url, "referred non-notebook link, passing through");
            return Ok(Redirect::to(&remote_url).into_response());
        }

        let public =
            crawl_visibility(state.fetcher.as_ref(), &url_ref.robots_url(), &remote_url).await;

        if clone_intent(&state.config, request.clone_requested) {
            let destination = url_ref.clone_destination();
            return Ok(self.clone_to_user_server(&destination, Some(url_ref.scheme.as_str())));
        }

        let response = state.fetcher.fetch(&remote_url).await?;
        let raw_json = response.text().map_err(|_| {
            tracing::error!(%remote_url, "notebook body is not UTF-8");
            GatewayError::BadRequest(format!("{remote_url} is not UTF-8 text"))
        })?;

        let page = NotebookPage {
            raw_json,
            download_url: remote_url.clone(),
            provider_url: None,
            executor_url: None,
            breadcrumbs: Vec::new(),
            public,
            title: None,
            provider: None,
        };
        let html = state.renderer.finish_notebook(page).await?;
        Ok(Html(html).into_response())
    }
}
