//! # chartpub-core — Foundational Types for chartpub
//!
//! This crate defines the domain model shared by every other crate in the
//! workspace. It performs no storage or network I/O; everything here is a
//! pure function over in-memory values, which keeps the merge and sort
//! rules testable without a backend.
//!
//! ## Contents
//!
//! - `repository`: `Repository` coordinates and the load-time
//!   `RepositoryRegistry`.
//! - `chart`: `ChartMetadata`, the contents of a chart's `Chart.yaml`.
//! - `archive`: reading metadata out of a packaged chart (`.tgz`) and
//!   writing such packages.
//! - `digest`: SHA-256 content digests of chart archives.
//! - `index`: `IndexDocument` and `ChartVersion`, with last-writer-wins
//!   merge and newest-first version ordering.
//! - `error`: structured error enums for all of the above.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `chartpub-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod archive;
pub mod chart;
pub mod digest;
pub mod error;
pub mod index;
pub mod repository;

// Re-export primary types for ergonomic imports.
pub use archive::{package_chart, parse_archive};
pub use chart::{ChartMetadata, Maintainer};
pub use digest::{digest, digest_bytes};
pub use error::{ArchiveError, DigestError, IndexError, RegistryError};
pub use index::{ChartVersion, IndexDocument, INDEX_API_VERSION, INDEX_FILE_NAME};
pub use repository::{Repository, RepositoryRegistry};
