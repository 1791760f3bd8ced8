//! Resolver for notebooks on the local filesystem.

use std::path::Path;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use nb_core::{
    DirEntry, DirectoryListing, DirectoryView, EntryKind, LocalRef, NotebookPage,
    SourceReference, is_notebook_path, url_path_join
};
use tokio_util::io::ReaderStream;

use crate::error::{GatewayError, Result};
use crate::state::AppState;

use super::{NotebookSourceResolver, ResolveRequest, clone_intent};

pub struct LocalPathResolver;

impl LocalPathResolver {
    /// Snapshots a directory into an ordered listing: visible
    /// subdirectories first, then visible notebooks, everything else
    /// excluded.
    async fn scan_directory(
        state: &AppState,
        fullpath: &Path,
        relative_path: &str,
    ) -> Result<DirectoryListing> {
        let mut read_dir =
            tokio::fs::read_dir(fullpath).await.map_err(GatewayError::from_local_io)?;
        let mut dirs = Vec::new();
        let mut notebooks = Vec::new();

        while let Some(dent) =
            read_dir.next_entry().await.map_err(GatewayError::from_local_io)?
        {
            if !state.visibility.can_show(&dent.path()) {
                continue;
            }
            let name = dent.file_name().to_string_lossy().into_owned();
            let Ok(meta) = dent.metadata().await else {
                continue;
            };
            let modified_at: DateTime<Utc> =
                meta.modified().map(DateTime::from).unwrap_or(DateTime::UNIX_EPOCH);
            let url = url_path_join(&[&state.config.local_prefix, relative_path, &name]);

            if meta.is_dir() {
                dirs.push(DirEntry { name, kind: EntryKind::Directory, modified_at, url });
            } else if is_notebook_path(&name) {
                notebooks.push(DirEntry { name, kind: EntryKind::Notebook, modified_at, url });
            }
        }

        Ok(DirectoryListing::assemble(dirs, notebooks))
    }

    /// Streams the file back as a forced download.
    async fn download(fullpath: &Path) -> Result<Response> {
        let file = tokio::fs::File::open(fullpath).await.map_err(GatewayError::from_local_io)?;
        let filename = fullpath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string());
        let headers = [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ];
        Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
    }
}

#[async_trait]
impl NotebookSourceResolver for LocalPathResolver {
    fn provider(&self) -> &'static str {
        "local"
    }

    async fn resolve(&self, state: &AppState, request: ResolveRequest) -> Result<Response> {
        let SourceReference::Local(local_ref) = &request.source else {
            return Err(GatewayError::Internal("local resolver got a non-local source".into()));
        };
        let LocalRef { absolute_path, relative_path } = local_ref;

        // Absent and hidden must be indistinguishable.
        if !state.visibility.can_show(absolute_path) {
            return Err(GatewayError::NotFound);
        }

        let meta =
            tokio::fs::metadata(absolute_path).await.map_err(GatewayError::from_local_io)?;
        if meta.is_dir() {
            let listing = Self::scan_directory(state, absolute_path, relative_path).await?;
            tracing::debug!(
                path = %relative_path,
                entries = listing.entries.len(),
                "rendering directory listing"
            );
            let title = if relative_path.is_empty() {
                "/".to_string()
            } else {
                format!("{}/", relative_path.trim_end_matches('/'))
            };
            let view = DirectoryView {
                listing,
                breadcrumbs: nb_core::breadcrumbs(relative_path, &state.config.local_prefix),
                title,
                clone_enabled: state.config.clone_notebooks,
            };
            let html = state.renderer.directory_listing(view).await?;
            return Ok(Html(html).into_response());
        }

        if request.download_requested {
            return Self::download(absolute_path).await;
        }

        if clone_intent(&state.config, request.clone_requested) {
            let destination = absolute_path.to_string_lossy();
            return Ok(self.clone_to_user_server(&destination, None));
        }

        let raw_json = match tokio::fs::read(absolute_path).await {
            Ok(bytes) => String::from_utf8(bytes).map_err(|_| {
                GatewayError::Internal(format!("{relative_path} is not UTF-8 text"))
            })?,
            Err(err) => return Err(GatewayError::from_local_io(err)),
        };

        let title = relative_path.rsplit('/').next().unwrap_or(relative_path).to_string();
        let page = NotebookPage {
            raw_json,
            download_url: "?download".to_string(),
            provider_url: None,
            executor_url: None,
            breadcrumbs: nb_core::breadcrumbs(relative_path, &state.config.local_prefix),
            public: false,
            title: Some(title),
            provider: None,
        };
        let html = state.renderer.finish_notebook(page).await?;
        Ok(Html(html).into_response())
    }
}
