//! Resolver for files inside a hosted repository.
//!
//! A path is either a notebook (rendered), a non-notebook file (served
//! verbatim with a guessed content type), or a directory (redirected to
//! the tree browsing view).

use async_trait::async_trait;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use nb_core::{
    Breadcrumb, NotebookPage, ProviderContext, RepoRef, SourceReference, TreeEntryKind,
    is_notebook_path, quote_path
};
use serde::Deserialize;

use crate::error::{GatewayError, Result};
use crate::state::{AppState, GatewayConfig};

use super::{NotebookSourceResolver, ResolveRequest, clone_intent};

/// Fixed display metadata for this provider and its executor.
const PROVIDER_CTX: ProviderContext = ProviderContext {
    provider_label: "GitHub",
    provider_icon: "github",
    executor_label: "Binder",
    executor_icon: "icon-binder",
};

/// Blob content payload from the repository contents API.
#[derive(Debug, Deserialize)]
struct BlobPayload {
    content: String,
    encoding: String,
}

impl BlobPayload {
    /// Base64 payloads arrive with embedded newlines; anything else is
    /// already text.
    fn decode(self) -> Result<Vec<u8>> {
        if self.encoding == "base64" {
            let compact: String = self.content.split_whitespace().collect();
            BASE64.decode(compact.as_bytes()).map_err(|e| GatewayError::Upstream {
                status: 502,
                message: format!("invalid base64 blob: {e}"),
            })
        } else {
            Ok(self.content.into_bytes())
        }
    }
}

pub struct GithubBlobResolver;

impl GithubBlobResolver {
    fn raw_url(repo_ref: &RepoRef) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            repo_ref.owner,
            repo_ref.repo,
            repo_ref.revision,
            quote_path(&repo_ref.path)
        )
    }

    fn blob_url(config: &GatewayConfig, repo_ref: &RepoRef) -> String {
        format!(
            "{}{}/{}/blob/{}/{}",
            config.github_url,
            repo_ref.owner,
            repo_ref.repo,
            repo_ref.revision,
            quote_path(&repo_ref.path)
        )
    }

    /// Executor deep link, only when a launch base URL is configured.
    fn executor_url(config: &GatewayConfig, repo_ref: &RepoRef) -> Option<String> {
        config.binder_base_url.as_ref().map(|base| {
            format!(
                "{}/gh/{}/{}/{}?filepath={}",
                base.trim_end_matches('/'),
                repo_ref.owner,
                repo_ref.repo,
                repo_ref.revision,
                quote_path(&repo_ref.path)
            )
        })
    }

    fn breadcrumbs(repo_ref: &RepoRef) -> Vec<Breadcrumb> {
        let base_url = format!(
            "/github/{}/{}/tree/{}",
            repo_ref.owner, repo_ref.repo, repo_ref.revision
        );
        let mut crumbs = vec![Breadcrumb { name: repo_ref.repo.clone(), url: base_url.clone() }];
        let dir_path = repo_ref.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        crumbs.extend(nb_core::breadcrumbs(dir_path, &base_url));
        crumbs
    }
}

#[async_trait]
impl NotebookSourceResolver for GithubBlobResolver {
    fn provider(&self) -> &'static str {
        "github"
    }

    async fn resolve(&self, state: &AppState, request: ResolveRequest) -> Result<Response> {
        let SourceReference::Repo(repo_ref) = &request.source else {
            return Err(GatewayError::Internal("blob resolver got a non-repo source".into()));
        };

        // Cloning a known-notebook path never needs its content first.
        if is_notebook_path(&repo_ref.path) && clone_intent(&state.config, request.clone_requested)
        {
            return Ok(self.clone_to_user_server(&repo_ref.clone_destination(), None));
        }

        let entry = state
            .repo_client
            .tree_entry(&repo_ref.owner, &repo_ref.repo, &repo_ref.path, &repo_ref.revision)
            .await?;

        if entry.kind == TreeEntryKind::Directory {
            let tree_url = format!(
                "/github/{}/{}/tree/{}/{}/",
                repo_ref.owner,
                repo_ref.repo,
                repo_ref.revision,
                quote_path(&repo_ref.path)
            );
            tracing::info!(path = %repo_ref.path, %tree_url, "directory path, redirecting to tree view");
            return Ok(Redirect::to(&tree_url).into_response());
        }

        let content_url = entry
            .content_url
            .ok_or_else(|| GatewayError::Internal("file entry without content URL".into()))?;
        let response = state.repo_client.fetch(&content_url).await?;
        let payload: BlobPayload = serde_json::from_slice(&response.body).map_err(|e| {
            GatewayError::Upstream { status: 502, message: format!("malformed blob payload: {e}") }
        })?;
        let filedata = payload.decode()?;

        if is_notebook_path(&repo_ref.path) {
            let raw_url = Self::raw_url(repo_ref);
            let raw_json = String::from_utf8(filedata).map_err(|_| {
                tracing::error!(%raw_url, "failed to decode notebook");
                GatewayError::BadRequest(format!("{raw_url} is not UTF-8 text"))
            })?;

            let page = NotebookPage {
                raw_json,
                download_url: raw_url,
                provider_url: Some(Self::blob_url(&state.config, repo_ref)),
                executor_url: Self::executor_url(&state.config, repo_ref),
                breadcrumbs: Self::breadcrumbs(repo_ref),
                public: true,
                title: None,
                provider: Some(PROVIDER_CTX),
            };
            let html = state.renderer.finish_notebook(page).await?;
            Ok(Html(html).into_response())
        } else {
            let mime = mime_guess::from_path(&repo_ref.path)
                .first_raw()
                .unwrap_or("text/plain");
            Ok(([(header::CONTENT_TYPE, mime)], filedata).into_response())
        }
    }
}
