//! Production collaborators backed by reqwest: the outbound fetcher and
//! the repository contents client.

use std::time::Duration;

use async_trait::async_trait;
use nb_core::{
    FetchedResponse, Fetcher, RepoClientError, RepositoryClient, TransportError, TreeEntry,
    TreeEntryKind, quote_path
};
use reqwest::{Client, header};

use crate::error::GatewayError;

const USER_AGENT: &str = concat!("clone-gateway/", env!("CARGO_PKG_VERSION"));

fn connect_error(url: &str, err: &reqwest::Error) -> TransportError {
    TransportError::Connect { url: url.to_string(), reason: err.to_string() }
}

/// Single-attempt HTTP fetcher. Non-success statuses surface as
/// transport errors so callers never see an error body as content.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| connect_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| connect_error(url, &e))?;
        Ok(FetchedResponse { status: status.as_u16(), body: body.to_vec() })
    }
}

/// Repository client over the GitHub contents API.
pub struct GithubContentsClient {
    client: Client,
    api_base: String,
}

impl GithubContentsClient {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        Self::with_base("https://api.github.com", timeout)
    }

    /// Points the client at a different API origin (useful for testing
    /// and GitHub Enterprise deployments).
    pub fn with_base(api_base: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self { client, api_base: api_base.into().trim_end_matches('/').to_string() })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, RepoClientError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| connect_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RepoClientError::Api { status: status.as_u16(), message });
        }
        Ok(response)
    }
}

#[async_trait]
impl RepositoryClient for GithubContentsClient {
    async fn tree_entry(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        revision: &str,
    ) -> Result<TreeEntry, RepoClientError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            quote_path(path),
            urlencoding::encode(revision)
        );
        let response = self.get(&url).await?;
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RepoClientError::Payload(e.to_string()))?;

        // The contents API answers with an array for directories and an
        // object for anything else.
        if payload.is_array() || payload.get("type").and_then(|t| t.as_str()) == Some("dir") {
            return Ok(TreeEntry { kind: TreeEntryKind::Directory, content_url: None, raw_url: None });
        }

        let content_url = payload
            .get("url")
            .and_then(|u| u.as_str())
            .map(str::to_string)
            .ok_or_else(|| RepoClientError::Payload("file entry without content URL".into()))?;
        let raw_url =
            payload.get("download_url").and_then(|u| u.as_str()).map(str::to_string);

        Ok(TreeEntry { kind: TreeEntryKind::File, content_url: Some(content_url), raw_url })
    }

    async fn fetch(&self, content_url: &str) -> Result<FetchedResponse, RepoClientError> {
        let response = self.get(content_url).await?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| connect_error(content_url, &e))?;
        Ok(FetchedResponse { status, body: body.to_vec() })
    }
}
