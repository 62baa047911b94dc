//! # Storage Error Types
//!
//! "Not modified" and "not found" are not errors: they are ordinary
//! [`GetOutcome`](crate::GetOutcome) variants. Everything here is a real
//! failure that callers surface or retry at a higher layer.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from storage backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem I/O failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The object path is not acceptable to the backend.
    #[error("invalid object path: {0}")]
    InvalidPath(String),

    /// The operation did not complete within its deadline.
    #[error("storage {operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The backend rejected the request.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
