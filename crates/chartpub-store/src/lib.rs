//! # chartpub-store — Object Storage Boundary
//!
//! The publisher talks to its backing object store only through the
//! [`Storage`] trait defined here. The trait models a blob store with
//! content-hash addressed responses and conditional reads:
//!
//! - `put` writes a blob and returns the hash of what was written.
//! - `get` takes the caller's last known hash and answers with a
//!   three-way [`GetOutcome`]: a fresh body, "not modified", or "not found".
//! - `url` yields the public base URL for a directory, used to build
//!   download links in index entries.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: process-local, for tests and ephemeral deployments.
//! - [`FilesystemStore`]: objects as files under a root directory.
//!
//! Both hash content with SHA-256, so the same bytes produce the same hash
//! regardless of backend.

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use config::StorageConfig;
pub use error::StoreError;
pub use fs::FilesystemStore;
pub use memory::MemoryStore;
pub use traits::{GetOutcome, GetResponse, PutResponse, Storage};

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of stored content.
pub fn content_hash(content: &[u8]) -> String {
    Sha256::digest(content)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Join URL segments with exactly one `/` between them, skipping empty ones.
pub(crate) fn join_url(base_url: &str, segments: &[&str]) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !url.is_empty() {
            url.push('/');
        }
        url.push_str(segment);
    }
    url
}
