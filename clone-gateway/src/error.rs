//! Error taxonomy for the clone gateway.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nb_core::{RenderError, RepoClientError, TransportError};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors a resolver can surface to the HTTP layer.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Content failed required text decoding; never partially rendered.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Hidden, missing, or unreadable. Deliberately indistinguishable.
    #[error("not found")]
    NotFound,

    /// Error status propagated verbatim from the repository provider.
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Outbound fetch failure outside the robots.txt check.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Render pipeline failure.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error for unexpected conditions.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Maps a local filesystem error. Permission problems hide the
    /// file's existence exactly like absence does.
    pub fn from_local_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Self::NotFound,
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoClientError> for GatewayError {
    fn from(err: RepoClientError) -> Self {
        match err {
            RepoClientError::Api { status, message } => Self::Upstream { status, message },
            RepoClientError::Transport(e) => Self::Transport(e),
            RepoClientError::Payload(message) => Self::Upstream { status: 502, message },
        }
    }
}

/// Error response body for HTTP endpoints.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            Self::NotFound => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "not found".to_string(), None)
            }
            Self::Upstream { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "UPSTREAM_ERROR",
                message.clone(),
                None,
            ),
            Self::Transport(e) => {
                tracing::error!(error = %e, "Transport error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TRANSPORT_ERROR",
                    "An upstream fetch failed".to_string(),
                    Some(e.to_string()),
                )
            }
            Self::Render(e) => {
                tracing::error!(error = %e, "Render pipeline error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "Failed to render the page".to_string(),
                    None,
                )
            }
            Self::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                msg.clone(),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(message = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = ErrorResponse { error: message, code: code.to_string(), details };

        (status, Json(body)).into_response()
    }
}
