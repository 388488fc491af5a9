// error.rs — request-level error kinds shared by every REST handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Everything a handler can fail with. The REST layer maps each variant to
/// an HTTP status; nothing here is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request fields. Client error.
    #[error("{0}")]
    InvalidInput(String),

    /// Credentials did not match.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested row does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unique-constraint style conflicts (duplicate username/email).
    #[error("{0}")]
    Conflict(String),

    /// The completion endpoint answered with a non-success status.
    #[error("upstream service error: status {status}, {body}")]
    Upstream { status: u16, body: String },

    /// The completion endpoint could not be reached (timeout, DNS, TLS).
    #[error("upstream request failed: {0}")]
    UpstreamUnreachable(String),

    /// The completion text did not match the expected section structure.
    #[error("malformed completion: {0}")]
    MalformedResponse(String),

    /// Persistence failure.
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream { .. }
            | ApiError::UpstreamUnreachable(_)
            | ApiError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, err = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
