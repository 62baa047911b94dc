//! # Filesystem Storage Backend
//!
//! Objects are stored as plain files at `{root}/{bucket}/{path}`.
//!
//! ## Atomic writes
//!
//! Content is written to a temporary sibling file and renamed into place,
//! so a concurrent reader sees either the previous object or the new one,
//! never a partial write.
//!
//! ## Path validation
//!
//! Buckets and paths are relative, `/`-separated, and may not contain
//! empty, `.` or `..` segments. Anything else is `InvalidPath`, which keeps
//! every object inside `root`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::traits::{GetOutcome, GetResponse, PutResponse, Storage};
use crate::{content_hash, join_url};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Object store backed by a local directory.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
    base_url: String,
}

impl FilesystemStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of `bucket`/`path`.
    pub fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StoreError> {
        let mut location = self.root.clone();
        push_segments(&mut location, bucket)?;
        push_segments(&mut location, path)?;
        Ok(location)
    }
}

fn push_segments(location: &mut PathBuf, raw: &str) -> Result<(), StoreError> {
    if raw.is_empty() {
        return Err(StoreError::InvalidPath("empty path".to_string()));
    }
    for segment in raw.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return Err(StoreError::InvalidPath(raw.to_string()));
        }
        location.push(segment);
    }
    Ok(())
}

fn temp_sibling(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
}

#[async_trait]
impl Storage for FilesystemStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
    ) -> Result<PutResponse, StoreError> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let hash = content_hash(&content);
        let temp = temp_sibling(&target);
        if let Err(e) = tokio::fs::write(&temp, &content).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StoreError::io(&temp, e));
        }
        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StoreError::io(&target, e));
        }

        tracing::debug!(path = %target.display(), %hash, bytes = content.len(), "stored object");
        Ok(PutResponse { hash })
    }

    async fn get(
        &self,
        bucket: &str,
        path: &str,
        known_hash: &str,
    ) -> Result<GetOutcome, StoreError> {
        let target = self.object_path(bucket, path)?;
        let body = match tokio::fs::read(&target).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(GetOutcome::NotFound),
            Err(e) => return Err(StoreError::io(&target, e)),
        };

        let hash = content_hash(&body);
        if !known_hash.is_empty() && hash == known_hash {
            return Ok(GetOutcome::NotModified);
        }
        Ok(GetOutcome::Fresh(GetResponse {
            hash,
            body: Bytes::from(body),
        }))
    }

    fn url(&self, bucket: &str, directory: &str) -> String {
        join_url(&self.base_url, &[bucket, directory])
    }
}
