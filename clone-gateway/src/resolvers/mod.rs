//! One resolver per notebook source kind.
//!
//! Each resolver owns the full request strategy for its source: decide
//! whether cloning was requested, compute the provider-specific clone
//! redirect, or fall through to rendering / raw serving. Resolvers share
//! nothing beyond this interface and the collaborator contracts.

mod github;
mod local;
mod url;

pub use github::GithubBlobResolver;
pub use local::LocalPathResolver;
pub use url::RemoteUrlResolver;

use async_trait::async_trait;
use axum::response::{IntoResponse, Redirect, Response};
use nb_core::SourceReference;

use crate::error::Result;
use crate::state::{AppState, GatewayConfig};

/// Per-request input shared by all source resolvers.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub source: SourceReference,
    /// The `clone` query flag was present.
    pub clone_requested: bool,
    /// The `download` query flag was present.
    pub download_requested: bool,
    /// Referer header, when sent.
    pub referer: Option<String>,
    /// Host header of this request.
    pub host: Option<String>,
}

/// A request-handling strategy for one notebook source kind.
#[async_trait]
pub trait NotebookSourceResolver: Send + Sync {
    /// Provider token used in the user-redirect clone path.
    fn provider(&self) -> &'static str;

    /// Resolves one request to its terminal response.
    async fn resolve(&self, state: &AppState, request: ResolveRequest) -> Result<Response>;

    /// Terminal redirect handing `destination` to the workspace-launch
    /// workflow. No further content resolution happens after this.
    fn clone_to_user_server(&self, destination: &str, protocol: Option<&str>) -> Response {
        let mut location = format!(
            "/user-redirect/{}_clone?clone_from={}",
            self.provider(),
            urlencoding::encode(destination)
        );
        if let Some(protocol) = protocol {
            location.push_str("&protocol=");
            location.push_str(protocol);
        }
        tracing::info!(provider = self.provider(), destination, "clone redirect issued");
        metrics::counter!("gateway_clone_redirects_total", "provider" => self.provider())
            .increment(1);
        Redirect::to(&location).into_response()
    }
}

/// Clone intent requires both the query flag and the feature toggle.
pub(crate) fn clone_intent(config: &GatewayConfig, clone_requested: bool) -> bool {
    config.clone_notebooks && clone_requested
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    struct Probe;

    #[async_trait]
    impl NotebookSourceResolver for Probe {
        fn provider(&self) -> &'static str {
            "probe"
        }

        async fn resolve(&self, _state: &AppState, _request: ResolveRequest) -> Result<Response> {
            unreachable!("not exercised")
        }
    }

    #[test]
    fn clone_redirect_escapes_destination() {
        let response = Probe.clone_to_user_server("octo/demo/a.ipynb/main", None);
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers()[LOCATION],
            "/user-redirect/probe_clone?clone_from=octo%2Fdemo%2Fa.ipynb%2Fmain"
        );
    }

    #[test]
    fn clone_redirect_appends_protocol() {
        let response = Probe.clone_to_user_server("example.com/nb.ipynb", Some("https"));
        assert_eq!(
            response.headers()[LOCATION],
            "/user-redirect/probe_clone?clone_from=example.com%2Fnb.ipynb&protocol=https"
        );
    }

    #[test]
    fn clone_intent_needs_flag_and_toggle() {
        let enabled = GatewayConfig::builder().clone_notebooks(true).build();
        let disabled = GatewayConfig::default();
        assert!(clone_intent(&enabled, true));
        assert!(!clone_intent(&enabled, false));
        assert!(!clone_intent(&disabled, true));
    }
}
