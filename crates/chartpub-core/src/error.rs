//! # Error Types
//!
//! Structured errors for the pure domain operations in `chartpub-core`.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! - Registry errors name the offending repository.
//! - Archive errors distinguish "not an archive at all" from "an archive
//!   without usable chart metadata".
//! - Digest errors wrap the I/O failure of the reader being hashed.

use thiserror::Error;

/// Errors from building or querying the repository registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No repository is configured under this name.
    #[error("repository not found: {0}")]
    NotFound(String),

    /// Two repositories were configured with the same name.
    #[error("duplicate repository name: {0}")]
    Duplicate(String),

    /// A repository definition is unusable.
    #[error("invalid repository {name:?}: {reason}")]
    Invalid {
        /// The repository name as configured (may be empty).
        name: String,
        /// Why the definition was rejected.
        reason: String,
    },
}

/// Errors from reading or writing a packaged chart archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The bytes do not start with the gzip magic number.
    #[error("chart archive is not gzip-compressed")]
    NotGzip,

    /// Decompression or tar framing failed.
    #[error("chart archive is unreadable: {0}")]
    Io(#[from] std::io::Error),

    /// The archive has no `<chart>/Chart.yaml` entry.
    #[error("chart metadata (Chart.yaml) missing")]
    MissingChartFile,

    /// `Chart.yaml` exists but is not valid chart metadata.
    #[error("invalid Chart.yaml: {0}")]
    InvalidChartFile(#[source] serde_yaml::Error),

    /// A required metadata field is empty.
    #[error("Chart.yaml is missing required field `{0}`")]
    MissingField(&'static str),

    /// `Chart.yaml` is larger than the accepted maximum.
    #[error("Chart.yaml exceeds {limit} bytes")]
    TooLarge {
        /// Maximum accepted size in bytes.
        limit: u64,
    },
}

/// Error computing a content digest.
#[derive(Error, Debug)]
pub enum DigestError {
    /// Reading the content failed part-way through.
    #[error("digest read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encoding or decoding an index document.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The document could not be serialized.
    #[error("index encode failed: {0}")]
    Encode(#[source] serde_yaml::Error),

    /// The bytes are not a valid index document.
    #[error("index decode failed: {0}")]
    Decode(#[source] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_repository() {
        let err = RegistryError::NotFound("stable".to_string());
        assert_eq!(err.to_string(), "repository not found: stable");
    }

    #[test]
    fn invalid_display_includes_reason() {
        let err = RegistryError::Invalid {
            name: "incubator".to_string(),
            reason: "bucket must not be empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("incubator"));
        assert!(msg.contains("bucket must not be empty"));
    }

    #[test]
    fn missing_field_display() {
        let err = ArchiveError::MissingField("version");
        assert!(err.to_string().contains("`version`"));
    }

    #[test]
    fn too_large_display_names_limit() {
        let err = ArchiveError::TooLarge { limit: 1024 };
        assert_eq!(err.to_string(), "Chart.yaml exceeds 1024 bytes");
    }

    #[test]
    fn io_error_converts_into_digest_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err = DigestError::from(io_err);
        assert!(err.to_string().contains("short read"));
    }
}
