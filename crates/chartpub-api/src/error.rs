//! # Application Error
//!
//! Maps publisher errors to structured HTTP responses with proper
//! status codes and error bodies. Server-side failures are logged in
//! full; clients only see the status reason.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chartpub_publisher::PublisherError;
use chartpub_store::StoreError;
use thiserror::Error;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown repository.
    #[error("not found: {0}")]
    NotFound(String),

    /// The upload is not an acceptable chart.
    #[error("validation error: {0}")]
    Validation(String),

    /// The request body could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The object store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The object store did not answer in time.
    #[error("storage timeout: {0}")]
    Timeout(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PublisherError> for AppError {
    fn from(err: PublisherError) -> Self {
        let message = err.to_string();
        match err {
            PublisherError::RepositoryNotFound(_) => Self::NotFound(message),
            PublisherError::InvalidFilename { .. } | PublisherError::Archive(_) => {
                Self::Validation(message)
            }
            PublisherError::Read(_) => Self::BadRequest(message),
            PublisherError::Storage {
                source: StoreError::Timeout { .. },
                ..
            } => Self::Timeout(message),
            PublisherError::Storage { .. } => Self::Storage(message),
            PublisherError::Digest(_)
            | PublisherError::Serialization(_)
            | PublisherError::CorruptIndex { .. } => Self::Internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            status.canonical_reason().unwrap_or("server error").to_string()
        } else {
            self.to_string()
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
