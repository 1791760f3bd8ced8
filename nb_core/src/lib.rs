//! # Notebook Gateway Core
//!
//! Shared types and collaborator contracts for the notebook clone gateway.
//!
//! This crate provides:
//! - Source reference types for the three notebook source kinds
//!   (remote URL, repository blob, local path)
//! - Collaborator traits for the external capabilities the gateway
//!   consumes (transport, repository API, render pipeline, visibility)
//! - URL escaping and breadcrumb helpers shared by the resolvers

pub mod breadcrumbs;
pub mod error;
pub mod escape;
pub mod traits;
pub mod types;

// Re-export commonly used items for convenience
pub use breadcrumbs::breadcrumbs;
pub use error::{RenderError, RepoClientError, TransportError};
pub use escape::{quote_path, unescape, url_path_join};
pub use traits::{Fetcher, RenderPipeline, RepositoryClient, VisibilityPredicate};
pub use types::{
    Breadcrumb, DirEntry, DirectoryListing, DirectoryView, EntryKind, FetchedResponse, LocalRef,
    NotebookPage, ProviderContext, RepoRef, Scheme, SourceReference, TreeEntry, TreeEntryKind,
    UrlRef, is_notebook_path
};
