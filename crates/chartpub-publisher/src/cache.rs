//! # Index Cache
//!
//! Per-repository cached index documents behind a single process-wide
//! reader/writer lock. The lock is never held across an `.await`.
//!
//! Each entry carries a generation number that increases on every
//! mutation. Callers that read a snapshot, perform storage I/O, and then
//! want to write back pass the snapshot's generation so a write based on
//! stale information does not clobber a newer entry.

use std::collections::HashMap;
use std::sync::Arc;

use chartpub_core::IndexDocument;
use parking_lot::RwLock;

/// A consistent view of one repository's cached index.
#[derive(Debug, Clone)]
pub struct CachedIndex {
    hash: String,
    document: Arc<IndexDocument>,
    generation: u64,
}

impl CachedIndex {
    fn empty() -> Self {
        Self {
            hash: String::new(),
            document: Arc::new(IndexDocument::new()),
            generation: 0,
        }
    }

    /// Store hash the document was last confirmed under; empty if never synced.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn document(&self) -> &Arc<IndexDocument> {
        &self.document
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cached index documents keyed by repository name.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: RwLock<HashMap<String, CachedIndex>>,
}

impl IndexCache {
    /// A cache with an empty, never-synced entry per repository.
    pub fn new<'a>(repositories: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = repositories
            .into_iter()
            .map(|name| (name.to_string(), CachedIndex::empty()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Read the hash and document together.
    pub fn snapshot(&self, repository: &str) -> CachedIndex {
        self.entries
            .read()
            .get(repository)
            .cloned()
            .unwrap_or_else(CachedIndex::empty)
    }

    /// Replace the entry with a freshly fetched document, unless it was
    /// mutated after the snapshot at `generation` was taken.
    pub fn replace_if_unchanged(
        &self,
        repository: &str,
        generation: u64,
        hash: String,
        document: Arc<IndexDocument>,
    ) -> bool {
        let mut entries = self.entries.write();
        let entry = entries
            .entry(repository.to_string())
            .or_insert_with(CachedIndex::empty);
        if entry.generation != generation {
            return false;
        }
        *entry = CachedIndex {
            hash,
            document,
            generation: generation + 1,
        };
        true
    }

    /// Swap in a merged document, keeping the old hash until the write is
    /// confirmed. Returns the new generation.
    pub fn swap_document(&self, repository: &str, document: Arc<IndexDocument>) -> u64 {
        let mut entries = self.entries.write();
        let entry = entries
            .entry(repository.to_string())
            .or_insert_with(CachedIndex::empty);
        entry.document = document;
        entry.generation += 1;
        entry.generation
    }

    /// Record the hash of a persisted document, if the document swapped in
    /// at `generation` is still the cached one.
    pub fn confirm_hash(&self, repository: &str, generation: u64, hash: String) -> bool {
        let mut entries = self.entries.write();
        match entries.get_mut(repository) {
            Some(entry) if entry.generation == generation => {
                entry.hash = hash;
                entry.generation += 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartpub_core::ChartMetadata;

    fn document_with(name: &str) -> Arc<IndexDocument> {
        let mut index = IndexDocument::new();
        index.add(ChartMetadata::new(name, "1.0.0"), "x.tgz", "", "00");
        Arc::new(index)
    }

    #[test]
    fn starts_empty_and_unsynced() {
        let cache = IndexCache::new(["stable"]);
        let snapshot = cache.snapshot("stable");
        assert_eq!(snapshot.hash(), "");
        assert!(snapshot.document().is_empty());
        assert_eq!(snapshot.generation(), 0);
    }

    #[test]
    fn replace_requires_unchanged_generation() {
        let cache = IndexCache::new(["stable"]);
        let before = cache.snapshot("stable");

        assert!(cache.replace_if_unchanged("stable", before.generation(), "h1".into(), document_with("a")));
        let after = cache.snapshot("stable");
        assert_eq!(after.hash(), "h1");
        assert!(after.document().has("a", "1.0.0"));

        // A second writer still holding the old snapshot loses.
        assert!(!cache.replace_if_unchanged("stable", before.generation(), "h0".into(), document_with("b")));
        assert_eq!(cache.snapshot("stable").hash(), "h1");
    }

    #[test]
    fn swap_then_confirm() {
        let cache = IndexCache::new(["stable"]);
        cache.replace_if_unchanged("stable", 0, "h1".into(), document_with("a"));

        let merged = document_with("b");
        let generation = cache.swap_document("stable", merged.clone());
        let pending = cache.snapshot("stable");
        assert_eq!(pending.hash(), "h1");
        assert!(Arc::ptr_eq(pending.document(), &merged));

        assert!(cache.confirm_hash("stable", generation, "h2".into()));
        let synced = cache.snapshot("stable");
        assert_eq!(synced.hash(), "h2");
        assert!(Arc::ptr_eq(synced.document(), &merged));
    }

    #[test]
    fn confirm_skipped_after_concurrent_replace() {
        let cache = IndexCache::new(["stable"]);
        let generation = cache.swap_document("stable", document_with("a"));
        let fetched = cache.snapshot("stable");
        cache.replace_if_unchanged("stable", fetched.generation(), "remote".into(), document_with("c"));

        assert!(!cache.confirm_hash("stable", generation, "mine".into()));
        assert_eq!(cache.snapshot("stable").hash(), "remote");
    }

    #[test]
    fn unknown_repository_snapshot_is_empty() {
        let cache = IndexCache::default();
        assert!(cache.snapshot("ghost").document().is_empty());
        assert!(!cache.confirm_hash("ghost", 0, "h".into()));
    }
}
