//! # Publisher
//!
//! Orchestrates publishing a chart into a repository and reading a
//! repository's current index.
//!
//! ## Publish pipeline
//!
//! 1. Resolve the repository and validate the filename.
//! 2. Read the chart stream into memory.
//! 3. Store the raw archive at `repository.path(filename)`.
//! 4. Build a single-entry index from the archive.
//! 5. Under the repository's publish lock: fetch the current index,
//!    merge, swap the cached document, store the merged index and confirm
//!    the cached hash.
//!
//! A failure after step 3 leaves the archive orphaned in the store. A
//! failure storing the merged index leaves the cache holding the merged
//! document under the previous hash; the next fetch or publish corrects it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chartpub_core::{IndexDocument, RegistryError, Repository, RepositoryRegistry, INDEX_FILE_NAME};
use chartpub_store::{GetOutcome, Storage, StoreError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::IndexCache;
use crate::error::{PublisherError, Stage};
use crate::merge::{build_single_entry_index, merge_indexes};

/// Tunables for a [`Publisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    /// Upper bound on any single storage call.
    pub storage_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            storage_timeout: Duration::from_secs(30),
        }
    }
}

/// Publishes charts into repositories and serves their indexes.
pub struct Publisher {
    registry: RepositoryRegistry,
    store: Arc<dyn Storage>,
    cache: IndexCache,
    publish_locks: HashMap<String, Mutex<()>>,
    config: PublisherConfig,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("repositories", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Publisher {
    pub fn new(registry: RepositoryRegistry, store: Arc<dyn Storage>) -> Self {
        Self::with_config(registry, store, PublisherConfig::default())
    }

    pub fn with_config(
        registry: RepositoryRegistry,
        store: Arc<dyn Storage>,
        config: PublisherConfig,
    ) -> Self {
        let cache = IndexCache::new(registry.iter().map(|r| r.name.as_str()));
        let publish_locks = registry
            .iter()
            .map(|r| (r.name.clone(), Mutex::new(())))
            .collect();
        Self {
            registry,
            store,
            cache,
            publish_locks,
            config,
        }
    }

    /// Configured repositories, sorted by name.
    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.registry.iter()
    }

    /// The in-memory index cache.
    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Current index of `repository`.
    ///
    /// Served from memory unless the store holds an index with a different
    /// content hash than the cached one.
    pub async fn get_index(&self, repository: &str) -> Result<Arc<IndexDocument>, PublisherError> {
        let repository = self.repository(repository)?;
        self.fetch_index(repository).await
    }

    /// Publish the chart read from `chart` into `repository` as `filename`.
    pub async fn publish<R>(
        &self,
        repository: &str,
        filename: &str,
        mut chart: R,
    ) -> Result<(), PublisherError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let repository = self.repository(repository)?;
        validate_filename(filename)?;

        let mut content = Vec::new();
        chart
            .read_to_end(&mut content)
            .await
            .map_err(PublisherError::Read)?;
        let content = Bytes::from(content);

        let chart_path = repository.path(filename);
        self.bounded("put", self.store.put(&repository.bucket, &chart_path, content.clone()))
            .await
            .map_err(PublisherError::storage(Stage::StoreChart))?;
        debug!(repository = %repository.name, path = %chart_path, bytes = content.len(), "stored chart archive");

        let base_url = self.store.url(&repository.bucket, &repository.directory);
        let single = build_single_entry_index(&content, filename, &base_url).map_err(|e| {
            warn!(repository = %repository.name, %filename, error = %e, "chart stored but not indexed");
            e
        })?;

        let lock = self
            .publish_locks
            .get(&repository.name)
            .ok_or_else(|| PublisherError::RepositoryNotFound(repository.name.clone()))?;
        let _guard = lock.lock().await;

        let current = self.fetch_index(repository).await?;
        let merged = Arc::new(merge_indexes(&current, single));
        let generation = self.cache.swap_document(&repository.name, Arc::clone(&merged));

        let body = merged.to_yaml().map_err(PublisherError::Serialization)?;
        let stored = self
            .bounded("put", self.store.put(&repository.bucket, &repository.index_path(), Bytes::from(body)))
            .await
            .map_err(|source| {
                warn!(
                    repository = %repository.name,
                    stage = %Stage::StoreIndex,
                    error = %source,
                    "merged index cached but not persisted"
                );
                PublisherError::storage(Stage::StoreIndex)(source)
            })?;

        if !self.cache.confirm_hash(&repository.name, generation, stored.hash.clone()) {
            debug!(repository = %repository.name, "cache entry replaced during index write");
        }
        info!(
            repository = %repository.name,
            %filename,
            hash = %stored.hash,
            charts = merged.len(),
            "published chart"
        );
        Ok(())
    }

    fn repository(&self, name: &str) -> Result<&Repository, PublisherError> {
        self.registry.get(name).map_err(|e| match e {
            RegistryError::NotFound(name) => PublisherError::RepositoryNotFound(name),
            _ => PublisherError::RepositoryNotFound(name.to_string()),
        })
    }

    async fn fetch_index(&self, repository: &Repository) -> Result<Arc<IndexDocument>, PublisherError> {
        let snapshot = self.cache.snapshot(&repository.name);
        let outcome = self
            .bounded(
                "get",
                self.store
                    .get(&repository.bucket, &repository.index_path(), snapshot.hash()),
            )
            .await
            .map_err(PublisherError::storage(Stage::FetchIndex))?;

        let response = match outcome {
            GetOutcome::Fresh(response) => response,
            GetOutcome::NotModified => {
                debug!(repository = %repository.name, hash = %snapshot.hash(), "index not modified");
                return Ok(Arc::clone(snapshot.document()));
            }
            GetOutcome::NotFound => {
                debug!(repository = %repository.name, "no stored index");
                return Ok(Arc::clone(snapshot.document()));
            }
        };

        let document = IndexDocument::from_yaml(&response.body).map_err(|source| {
            PublisherError::CorruptIndex {
                repository: repository.name.clone(),
                source,
            }
        })?;
        let document = Arc::new(document);
        if self.cache.replace_if_unchanged(
            &repository.name,
            snapshot.generation(),
            response.hash.clone(),
            Arc::clone(&document),
        ) {
            info!(repository = %repository.name, hash = %response.hash, "refreshed index from store");
        } else {
            debug!(repository = %repository.name, "cache changed during fetch, not replacing");
        }
        Ok(document)
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let after = self.config.storage_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout { operation, after }),
        }
    }
}

fn validate_filename(filename: &str) -> Result<(), PublisherError> {
    let reason = if filename.is_empty() {
        "must not be empty"
    } else if filename.contains(|c: char| c == '/' || c == '\\') {
        "must not contain path separators"
    } else if filename == "." || filename == ".." {
        "must not be a relative directory"
    } else if filename == INDEX_FILE_NAME {
        "is reserved for the repository index"
    } else if filename.chars().any(char::is_control) {
        "must not contain control characters"
    } else {
        return Ok(());
    };
    Err(PublisherError::InvalidFilename {
        filename: filename.to_string(),
        reason,
    })
}
