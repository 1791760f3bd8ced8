use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use nb_core::{
    DirectoryView, FetchedResponse, Fetcher, NotebookPage, RenderError, RenderPipeline,
    RepoClientError, RepositoryClient, TransportError, TreeEntry, VisibilityPredicate
};
use parking_lot::Mutex;

/// Scripted outcome for one URL known to [`MockFetcher`].
#[derive(Debug, Clone)]
enum Scripted {
    Body(Vec<u8>),
    StatusError(u16),
    ConnectError,
}

/// Fetcher double with per-URL scripted responses. Every fetch is
/// recorded; an unscripted URL fails with a connect error so tests
/// cannot silently fetch something unexpected.
#[derive(Default)]
pub struct MockFetcher {
    scripted: HashMap<String, Scripted>,
    fetched: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.scripted.insert(url.into(), Scripted::Body(body.into()));
        self
    }

    #[must_use]
    pub fn with_status_error(mut self, url: impl Into<String>, status: u16) -> Self {
        self.scripted.insert(url.into(), Scripted::StatusError(status));
        self
    }

    #[must_use]
    pub fn with_connect_error(mut self, url: impl Into<String>) -> Self {
        self.scripted.insert(url.into(), Scripted::ConnectError);
        self
    }

    /// Every URL fetched through this double, in call order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, TransportError> {
        self.fetched.lock().push(url.to_string());
        match self.scripted.get(url) {
            Some(Scripted::Body(body)) => Ok(FetchedResponse { status: 200, body: body.clone() }),
            Some(Scripted::StatusError(status)) => {
                Err(TransportError::Status { url: url.to_string(), status: *status })
            }
            Some(Scripted::ConnectError) | None => Err(TransportError::Connect {
                url: url.to_string(),
                reason: "no scripted response".to_string(),
            }),
        }
    }
}

/// Repository client double: one scripted tree entry plus one scripted
/// content payload, with recorded calls.
pub struct MockRepositoryClient {
    entry: Result<TreeEntry, (u16, String)>,
    blob_body: Vec<u8>,
    tree_entry_calls: Mutex<Vec<(String, String, String, String)>>,
    fetch_calls: Mutex<Vec<String>>,
}

impl MockRepositoryClient {
    pub fn with_entry(entry: TreeEntry) -> Self {
        Self {
            entry: Ok(entry),
            blob_body: Vec::new(),
            tree_entry_calls: Mutex::new(Vec::new()),
            fetch_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_api_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            entry: Err((status, message.into())),
            blob_body: Vec::new(),
            tree_entry_calls: Mutex::new(Vec::new()),
            fetch_calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_blob(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.blob_body = body.into();
        self
    }

    pub fn tree_entry_calls(&self) -> Vec<(String, String, String, String)> {
        self.tree_entry_calls.lock().clone()
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().clone()
    }
}

#[async_trait]
impl RepositoryClient for MockRepositoryClient {
    async fn tree_entry(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        revision: &str,
    ) -> Result<TreeEntry, RepoClientError> {
        self.tree_entry_calls.lock().push((
            owner.to_string(),
            repo.to_string(),
            path.to_string(),
            revision.to_string(),
        ));
        match &self.entry {
            Ok(entry) => Ok(entry.clone()),
            Err((status, message)) => {
                Err(RepoClientError::Api { status: *status, message: message.clone() })
            }
        }
    }

    async fn fetch(&self, content_url: &str) -> Result<FetchedResponse, RepoClientError> {
        self.fetch_calls.lock().push(content_url.to_string());
        Ok(FetchedResponse { status: 200, body: self.blob_body.clone() })
    }
}

/// Render pipeline double that echoes the interesting page fields into
/// the response body so tests can assert on them as text.
#[derive(Default)]
pub struct MockRenderPipeline {
    pages: Mutex<Vec<NotebookPage>>,
    views: Mutex<Vec<DirectoryView>>,
}

impl MockRenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered_pages(&self) -> Vec<NotebookPage> {
        self.pages.lock().clone()
    }

    pub fn rendered_views(&self) -> Vec<DirectoryView> {
        self.views.lock().clone()
    }
}

#[async_trait]
impl RenderPipeline for MockRenderPipeline {
    async fn finish_notebook(&self, page: NotebookPage) -> Result<String, RenderError> {
        let marker = format!(
            "notebook download={} public={} title={}",
            page.download_url,
            page.public,
            page.title.as_deref().unwrap_or("-")
        );
        self.pages.lock().push(page);
        Ok(marker)
    }

    async fn directory_listing(&self, view: DirectoryView) -> Result<String, RenderError> {
        let names: Vec<&str> = view.listing.entries.iter().map(|e| e.name.as_str()).collect();
        let marker = format!("listing {}", names.join(","));
        self.views.lock().push(view);
        Ok(marker)
    }
}

/// Visibility predicate with a fixed verdict.
pub struct StaticVisibility(pub bool);

impl VisibilityPredicate for StaticVisibility {
    fn can_show(&self, _absolute_path: &Path) -> bool {
        self.0
    }
}
