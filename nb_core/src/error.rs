//! Error types for the collaborator contracts.

use thiserror::Error;

/// Outbound fetch failures. A single attempt either yields a response or
/// one of these; non-success HTTP statuses count as transport failures,
/// matching the upstream transport collaborator's contract.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl TransportError {
    /// The HTTP status carried by the failure, when there was a response
    /// at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Connect { .. } => None,
            Self::Status { status, .. } => Some(*status),
        }
    }
}

/// Repository-hosting API failures.
#[derive(Debug, Error)]
pub enum RepoClientError {
    /// The provider reported an error status; it is propagated verbatim
    /// to the caller instead of being masked as a generic failure.
    #[error("provider API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected provider payload: {0}")]
    Payload(String),
}

/// Render pipeline failure, opaque to this subsystem.
#[derive(Debug, Error)]
#[error("render pipeline failed: {0}")]
pub struct RenderError(pub String);
