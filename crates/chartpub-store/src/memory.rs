//! In-memory storage backend.
//!
//! Objects live in a single map guarded by a reader/writer lock. Nothing
//! survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::traits::{GetOutcome, GetResponse, PutResponse, Storage};
use crate::{content_hash, join_url};

#[derive(Debug, Clone)]
struct StoredObject {
    hash: String,
    body: Bytes,
}

/// Process-local object store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    base_url: String,
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl MemoryStore {
    /// Create an empty store whose URLs start with `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Raw bytes stored at `bucket`/`path`, if any.
    pub fn object(&self, bucket: &str, path: &str) -> Option<Bytes> {
        self.objects
            .read()
            .get(&(bucket.to_string(), path.to_string()))
            .map(|object| object.body.clone())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
    ) -> Result<PutResponse, StoreError> {
        if path.is_empty() {
            return Err(StoreError::InvalidPath("empty path".to_string()));
        }
        let hash = content_hash(&content);
        self.objects.write().insert(
            (bucket.to_string(), path.to_string()),
            StoredObject {
                hash: hash.clone(),
                body: content,
            },
        );
        tracing::trace!(bucket, path, %hash, "memory store put");
        Ok(PutResponse { hash })
    }

    async fn get(
        &self,
        bucket: &str,
        path: &str,
        known_hash: &str,
    ) -> Result<GetOutcome, StoreError> {
        let objects = self.objects.read();
        let outcome = match objects.get(&(bucket.to_string(), path.to_string())) {
            None => GetOutcome::NotFound,
            Some(object) if !known_hash.is_empty() && object.hash == known_hash => {
                GetOutcome::NotModified
            }
            Some(object) => GetOutcome::Fresh(GetResponse {
                hash: object.hash.clone(),
                body: object.body.clone(),
            }),
        };
        Ok(outcome)
    }

    fn url(&self, bucket: &str, directory: &str) -> String {
        join_url(&self.base_url, &[bucket, directory])
    }
}
