//! Blog error types with HTTP status code mapping.
//!
//! [`BlogError`] is the central error type for request handling. Each
//! variant maps to a specific HTTP status code. Server-side failures are
//! logged with their details and answered with a generic body so that
//! store or template internals never leak to the browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category       | HTTP Status                 |
/// |-----------|----------------|-----------------------------|
/// | 1000–1999 | Validation     | 400 / 413                   |
/// | 2000–2999 | Authorization  | 401 Unauthorized            |
/// | 3000–3999 | Server         | 500 / 503                   |
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    /// The entry store could not be opened for this request.
    #[error("database unavailable: {0}")]
    Connection(#[source] sqlx::Error),

    /// Adding an entry requires a logged-in session.
    #[error("unauthorized")]
    Unauthorized,

    /// Submitted form data was missing or malformed.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The request body exceeded a size limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// A statement against the entry store failed.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The session layer failed to load or update session data.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// An HTML template failed to render.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlogError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::PayloadTooLarge => 1002,
            Self::Unauthorized => 2001,
            Self::Internal(_) => 3000,
            Self::Store(_) => 3001,
            Self::Connection(_) => 3002,
            Self::Session(_) => 3003,
            Self::Template(_) => 3004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) | Self::Session(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Unauthorized | Self::PayloadTooLarge => status.into_response(),
            Self::Validation(message) => (status, message).into_response(),
            other => {
                tracing::error!(code = other.error_code(), error = %other, "request failed");
                let reason = status.canonical_reason().unwrap_or("error");
                (status, reason.to_string()).into_response()
            }
        }
    }
}
