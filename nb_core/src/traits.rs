//! Collaborator contracts consumed by the gateway.
//!
//! These seams front capabilities owned elsewhere: the HTTP transport,
//! the repository-hosting API client, the render pipeline, and the
//! local-path visibility rules.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{RenderError, RepoClientError, TransportError};
use crate::types::{DirectoryView, FetchedResponse, NotebookPage, TreeEntry};

/// Outbound HTTP transport. Every fetch is a single attempt; retry and
/// backpressure belong to the implementation, not the callers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, TransportError>;
}

/// Repository-hosting API client.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Resolves a path at a revision to a tree entry.
    async fn tree_entry(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        revision: &str,
    ) -> Result<TreeEntry, RepoClientError>;

    /// Fetches a tree entry's content API URL.
    async fn fetch(&self, content_url: &str) -> Result<FetchedResponse, RepoClientError>;
}

/// The rendering pipeline that turns notebook JSON and listing snapshots
/// into displayable HTML. Suspends until the page is produced.
#[async_trait]
pub trait RenderPipeline: Send + Sync {
    async fn finish_notebook(&self, page: NotebookPage) -> Result<String, RenderError>;

    async fn directory_listing(&self, view: DirectoryView) -> Result<String, RenderError>;
}

/// Local-path visibility rules. A `false` verdict hides the path's
/// existence entirely; callers must answer 404 without distinguishing
/// absent from forbidden.
pub trait VisibilityPredicate: Send + Sync {
    fn can_show(&self, absolute_path: &Path) -> bool;
}
