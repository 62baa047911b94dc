#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chartpub_core::{package_chart, ChartMetadata, Repository, RepositoryRegistry};
use chartpub_publisher::{Publisher, PublisherConfig};
use chartpub_store::{GetOutcome, MemoryStore, PutResponse, Storage, StoreError};

/// Storage double wrapping a `MemoryStore`: counts calls and can fail or
/// stall selected operations.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    gets: AtomicUsize,
    puts: AtomicUsize,
    not_modified: AtomicUsize,
    fail_puts_ending_with: Mutex<Option<String>>,
    get_delay: Mutex<Option<Duration>>,
}

impl RecordingStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: MemoryStore::new(base_url),
            ..Default::default()
        }
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn not_modified(&self) -> usize {
        self.not_modified.load(Ordering::SeqCst)
    }

    pub fn fail_puts_ending_with(&self, suffix: Option<&str>) {
        *self.fail_puts_ending_with.lock().unwrap() = suffix.map(str::to_string);
    }

    pub fn delay_gets(&self, delay: Option<Duration>) {
        *self.get_delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl Storage for RecordingStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
    ) -> Result<PutResponse, StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let failing = self.fail_puts_ending_with.lock().unwrap().clone();
        if let Some(suffix) = failing {
            if path.ends_with(&suffix) {
                return Err(StoreError::Backend(format!("injected failure writing {path}")));
            }
        }
        self.inner.put(bucket, path, content).await
    }

    async fn get(
        &self,
        bucket: &str,
        path: &str,
        known_hash: &str,
    ) -> Result<GetOutcome, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let delay = *self.get_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.inner.get(bucket, path, known_hash).await?;
        if outcome == GetOutcome::NotModified {
            self.not_modified.fetch_add(1, Ordering::SeqCst);
        }
        Ok(outcome)
    }

    fn url(&self, bucket: &str, directory: &str) -> String {
        self.inner.url(bucket, directory)
    }
}

pub const BASE_URL: &str = "https://charts.example.com";

pub fn registry() -> RepositoryRegistry {
    RepositoryRegistry::new([
        Repository::new("stable", "b", "p"),
        Repository::new("incubator", "b", "incubator"),
    ])
    .unwrap()
}

pub fn publisher(store: Arc<dyn Storage>) -> Publisher {
    Publisher::new(registry(), store)
}

pub fn publisher_with_timeout(store: Arc<dyn Storage>, timeout: Duration) -> Publisher {
    Publisher::with_config(
        registry(),
        store,
        PublisherConfig {
            storage_timeout: timeout,
        },
    )
}

pub fn chart(name: &str, version: &str) -> Vec<u8> {
    package_chart(&ChartMetadata::new(name, version), &[]).unwrap()
}

pub fn chart_described(name: &str, version: &str, description: &str) -> Vec<u8> {
    let metadata = ChartMetadata::new(name, version).with_description(description);
    package_chart(&metadata, &[("values.yaml", b"replicas: 1\n")]).unwrap()
}
