//! Application state and configuration for the clone gateway.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use nb_core::{Fetcher, RenderPipeline, RepositoryClient, VisibilityPredicate};

use crate::clients::{GithubContentsClient, HttpFetcher};
use crate::error::Result;
use crate::render::PlainRenderer;
use crate::resolvers::{
    GithubBlobResolver, LocalPathResolver, NotebookSourceResolver, RemoteUrlResolver
};
use crate::visibility::FsVisibility;

/// Immutable gateway configuration, established at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind the server to.
    pub host: String,
    /// Port to bind the server to.
    pub port: u16,
    /// Feature toggle for the clone-to-user-server workflow.
    pub clone_notebooks: bool,
    /// Root directory served by the local resolver.
    pub local_root: PathBuf,
    /// URL prefix the local resolver is mounted under.
    pub local_prefix: String,
    /// Base URL for human-facing repository blob links, trailing slash
    /// included.
    pub github_url: String,
    /// Executor (Binder-style) launch base URL; deep links are only
    /// built when this is set.
    pub binder_base_url: Option<String>,
    /// Outbound fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            clone_notebooks: false,
            local_root: PathBuf::from("."),
            local_prefix: "/localfile".to_string(),
            github_url: "https://github.com/".to_string(),
            binder_base_url: None,
            fetch_timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    /// Creates a configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            clone_notebooks: std::env::var("CLONE_NOTEBOOKS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.clone_notebooks),
            local_root: std::env::var("LOCALFILE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_root),
            local_prefix: defaults.local_prefix,
            github_url: std::env::var("GITHUB_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .map(ensure_trailing_slash)
                .unwrap_or(defaults.github_url),
            binder_base_url: std::env::var("BINDER_BASE_URL").ok().filter(|v| !v.is_empty()),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
        }
    }

    /// Creates a builder for configuration.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

fn ensure_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Builder for [`GatewayConfig`].
#[derive(Default)]
pub struct GatewayConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    clone_notebooks: Option<bool>,
    local_root: Option<PathBuf>,
    local_prefix: Option<String>,
    github_url: Option<String>,
    binder_base_url: Option<String>,
    fetch_timeout_secs: Option<u64>,
}

impl GatewayConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enables or disables the clone-to-user-server workflow.
    #[must_use]
    pub fn clone_notebooks(mut self, enable: bool) -> Self {
        self.clone_notebooks = Some(enable);
        self
    }

    #[must_use]
    pub fn local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn local_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.local_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn github_url(mut self, url: impl Into<String>) -> Self {
        self.github_url = Some(ensure_trailing_slash(url.into()));
        self
    }

    #[must_use]
    pub fn binder_base_url(mut self, url: impl Into<String>) -> Self {
        self.binder_base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = Some(secs);
        self
    }

    /// Builds the configuration, falling back to defaults for anything
    /// unset.
    pub fn build(self) -> GatewayConfig {
        let defaults = GatewayConfig::default();
        GatewayConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            clone_notebooks: self.clone_notebooks.unwrap_or(defaults.clone_notebooks),
            local_root: self.local_root.unwrap_or(defaults.local_root),
            local_prefix: self.local_prefix.unwrap_or(defaults.local_prefix),
            github_url: self.github_url.unwrap_or(defaults.github_url),
            binder_base_url: self.binder_base_url,
            fetch_timeout_secs: self.fetch_timeout_secs.unwrap_or(defaults.fetch_timeout_secs),
        }
    }
}

/// Shared application state for Axum handlers.
///
/// Everything here is process-wide, read-only configuration and
/// collaborators; per-request state lives on each handler's stack.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub fetcher: Arc<dyn Fetcher>,
    pub repo_client: Arc<dyn RepositoryClient>,
    pub renderer: Arc<dyn RenderPipeline>,
    pub visibility: Arc<dyn VisibilityPredicate>,
    pub url_resolver: Arc<dyn NotebookSourceResolver>,
    pub github_resolver: Arc<dyn NotebookSourceResolver>,
    pub local_resolver: Arc<dyn NotebookSourceResolver>,
}

impl AppState {
    /// Creates application state with production collaborators.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.fetch_timeout_secs);
        let fetcher = Arc::new(HttpFetcher::new(timeout)?);
        let repo_client = Arc::new(GithubContentsClient::new(timeout)?);
        let renderer = Arc::new(PlainRenderer);
        let visibility = Arc::new(FsVisibility::new(config.local_root.clone()));
        Ok(Self::with_collaborators(config, fetcher, repo_client, renderer, visibility))
    }

    /// Creates application state from explicit collaborators (useful
    /// for testing).
    #[must_use]
    pub fn with_collaborators(
        config: GatewayConfig,
        fetcher: Arc<dyn Fetcher>,
        repo_client: Arc<dyn RepositoryClient>,
        renderer: Arc<dyn RenderPipeline>,
        visibility: Arc<dyn VisibilityPredicate>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            repo_client,
            renderer,
            visibility,
            url_resolver: Arc::new(RemoteUrlResolver),
            github_resolver: Arc::new(GithubBlobResolver),
            local_resolver: Arc::new(LocalPathResolver),
        }
    }
}
