//! # chartpub-publisher — Index Cache and Publish Pipeline
//!
//! Keeps one authoritative `index.yaml` per repository coherent between the
//! object store and an in-memory cache, and merges newly published charts
//! into it.
//!
//! ## Operations
//!
//! - [`Publisher::get_index`]: return the current index, re-fetching from
//!   the store only when the store reports a different content hash.
//! - [`Publisher::publish`]: store a chart archive, merge its entry into
//!   the index, persist the index and refresh the cache.
//!
//! ## Cache states
//!
//! For each repository the cached index is always one of:
//!
//! - empty with an empty hash (never synced),
//! - exactly the document last fetched under its hash,
//! - exactly the document this process last wrote, with the hash the
//!   store returned for that write.
//!
//! Between swapping in a merged document and confirming the write, the
//! entry holds the merged document with the previous hash. If the write
//! fails it stays that way until the next successful publish or fetch.
//!
//! ## Concurrency
//!
//! All cache reads and writes go through one reader/writer lock, always
//! reading the hash and document together. Publishes to the same
//! repository are serialized end to end, so concurrent publishes in one
//! process cannot lose each other's entries. Publishes from other
//! processes sharing the store are not coordinated.

pub mod cache;
pub mod error;
pub mod merge;
pub mod publisher;

pub use cache::{CachedIndex, IndexCache};
pub use error::{PublisherError, Stage};
pub use merge::{build_single_entry_index, merge_indexes};
pub use publisher::{Publisher, PublisherConfig};
