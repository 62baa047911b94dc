//! # Storage Trait
//!
//! The port the publisher consumes. Implementations must be safe to share
//! across tasks; the publisher holds them as `Arc<dyn Storage>`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutResponse {
    /// Content hash of the bytes now stored at the path.
    pub hash: String,
}

/// A fetched object body with its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetResponse {
    pub hash: String,
    pub body: Bytes,
}

/// Outcome of a conditional read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    /// The stored content differs from the caller's known hash.
    Fresh(GetResponse),
    /// The stored content still matches the caller's known hash.
    NotModified,
    /// Nothing is stored at the path.
    NotFound,
}

/// A blob store with content-hash conditional reads.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `content` at `bucket`/`path`, replacing any existing object.
    async fn put(&self, bucket: &str, path: &str, content: Bytes)
        -> Result<PutResponse, StoreError>;

    /// Read `bucket`/`path` unless its content hash equals `known_hash`.
    ///
    /// An empty `known_hash` never matches.
    async fn get(&self, bucket: &str, path: &str, known_hash: &str)
        -> Result<GetOutcome, StoreError>;

    /// Public base URL of `directory` within `bucket`.
    fn url(&self, bucket: &str, directory: &str) -> String;
}
