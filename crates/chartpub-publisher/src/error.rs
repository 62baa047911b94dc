//! # Publisher Error Types
//!
//! Every failure of `publish` and `get_index` is one of these variants.
//! Storage failures carry the pipeline stage that hit them. Nothing is
//! retried inside the publisher; callers may retry the whole operation.

use chartpub_core::{ArchiveError, DigestError, IndexError};
use chartpub_store::StoreError;
use thiserror::Error;

/// Pipeline stage at which a storage call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Writing the raw chart archive.
    StoreChart,
    /// Conditionally reading the repository index.
    FetchIndex,
    /// Writing the merged repository index.
    StoreIndex,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StoreChart => "store chart",
            Self::FetchIndex => "fetch index",
            Self::StoreIndex => "store index",
        };
        f.write_str(s)
    }
}

/// Errors from publishing charts or reading indexes.
#[derive(Error, Debug)]
pub enum PublisherError {
    /// No repository is configured under this name.
    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    /// The chart filename cannot be stored safely.
    #[error("invalid chart filename {filename:?}: {reason}")]
    InvalidFilename {
        filename: String,
        reason: &'static str,
    },

    /// Reading the uploaded chart stream failed.
    #[error("read chart failed: {0}")]
    Read(#[source] std::io::Error),

    /// The upload is not a valid chart archive.
    #[error("load chart failed: {0}")]
    Archive(#[from] ArchiveError),

    /// Hashing the chart archive failed.
    #[error("digest chart failed: {0}")]
    Digest(#[from] DigestError),

    /// A storage call failed.
    #[error("{stage} failed: {source}")]
    Storage {
        stage: Stage,
        #[source]
        source: StoreError,
    },

    /// The merged index could not be encoded.
    #[error("encode index failed: {0}")]
    Serialization(#[source] IndexError),

    /// The stored index could not be decoded.
    #[error("stored index of repository {repository} is corrupt: {source}")]
    CorruptIndex {
        repository: String,
        #[source]
        source: IndexError,
    },
}

impl PublisherError {
    pub(crate) fn storage(stage: Stage) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { stage, source }
    }

    /// The failed stage, for storage errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Storage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
