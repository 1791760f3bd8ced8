//! Data model for the notebook clone gateway.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::escape::{quote_path, unescape};

/// File extension identifying renderable notebooks.
pub const NOTEBOOK_EXT: &str = ".ipynb";

/// Whether a path names a renderable notebook.
pub fn is_notebook_path(path: &str) -> bool {
    path.ends_with(NOTEBOOK_EXT)
}

/// Transport scheme flag for remote URL sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An externally hosted notebook location.
///
/// Fields are percent-decoded; they are re-encoded only when an outbound
/// URL is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRef {
    pub scheme: Scheme,
    pub host: String,
    pub path: String,
    /// Remote query carried inside the request path after a literal `/?`
    /// separator.
    pub query: Option<String>,
}

impl UrlRef {
    /// Normalizes an escaped host and path tail into a reference.
    ///
    /// The tail is split on the FIRST `/?` occurrence; everything after
    /// it is the remote query string.
    pub fn from_escaped(scheme: Scheme, host: &str, tail: &str) -> Self {
        let host = unescape(host);
        let (path, query) = match tail.split_once("/?") {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (tail.to_string(), None),
        };
        Self { scheme, host, path, query }
    }

    /// The reconstructed absolute URL, path re-encoded.
    pub fn absolute_url(&self) -> String {
        let mut url = format!("{}://{}/{}", self.scheme, self.host, quote_path(&self.path));
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// The robots.txt URL for this reference's origin.
    pub fn robots_url(&self) -> String {
        format!("{}://{}/robots.txt", self.scheme, self.host)
    }

    /// The clone destination token: `host/path`, query dropped.
    pub fn clone_destination(&self) -> String {
        format!("{}/{}", self.host, self.path)
    }
}

/// A path inside a hosted repository at a given revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub revision: String,
    pub path: String,
}

impl RepoRef {
    /// The clone destination token, revision last.
    pub fn clone_destination(&self) -> String {
        [self.owner.as_str(), &self.repo, &self.path, &self.revision].join("/")
    }
}

/// A filesystem path under the configured local root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRef {
    pub absolute_path: PathBuf,
    pub relative_path: String,
}

/// Where a notebook lives. Exactly one variant per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceReference {
    Url(UrlRef),
    Repo(RepoRef),
    Local(LocalRef),
}

/// Repository-hosting API descriptor of a resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: TreeEntryKind,
    /// Content API URL for fetching the blob payload. Absent for
    /// directories.
    pub content_url: Option<String>,
    /// Direct raw download URL, when the provider reports one.
    pub raw_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEntryKind {
    File,
    Directory,
}

/// Listing entry kind; anything else is excluded from listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    Notebook,
}

/// One row of a rendered directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    pub modified_at: DateTime<Utc>,
    pub url: String,
}

/// Ordered directory snapshot: directories first, then notebooks, each
/// partition sorted by name. Built fresh per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    pub entries: Vec<DirEntry>,
}

impl DirectoryListing {
    pub fn assemble(mut dirs: Vec<DirEntry>, mut notebooks: Vec<DirEntry>) -> Self {
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        notebooks.sort_by(|a, b| a.name.cmp(&b.name));
        dirs.extend(notebooks);
        Self { entries: dirs }
    }
}

/// Navigation link shown above rendered content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

/// Fixed display metadata for a hosting provider and its executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderContext {
    pub provider_label: &'static str,
    pub provider_icon: &'static str,
    pub executor_label: &'static str,
    pub executor_icon: &'static str,
}

/// Everything the render pipeline needs to finish a notebook page.
#[derive(Debug, Clone)]
pub struct NotebookPage {
    pub raw_json: String,
    pub download_url: String,
    pub provider_url: Option<String>,
    pub executor_url: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Whether the rendered page may be served from a shared cache.
    pub public: bool,
    pub title: Option<String>,
    pub provider: Option<ProviderContext>,
}

/// Input for the directory-listing template.
#[derive(Debug, Clone)]
pub struct DirectoryView {
    pub listing: DirectoryListing,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub title: String,
    /// Lets the template show per-entry clone affordances.
    pub clone_enabled: bool,
}

/// Body and status of a completed outbound fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Strict UTF-8 body decoding; partial decoding is never attempted.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }
}
