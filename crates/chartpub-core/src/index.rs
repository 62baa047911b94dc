//! # Index Documents
//!
//! An [`IndexDocument`] is a repository's `index.yaml`: every published
//! chart version, grouped by chart name, plus a generation timestamp.
//!
//! ## Merge
//!
//! [`IndexDocument::merge`] is a union keyed by `(name, version)`. When both
//! sides hold the same key the incoming entry replaces the existing one, so
//! republishing a chart version overwrites its record. Merging leaves the
//! version order within each group unspecified; call
//! [`IndexDocument::sort_entries`] afterwards.
//!
//! ## Ordering
//!
//! Groups are kept in a `BTreeMap`, so chart names serialize in
//! lexicographic order. Within a group, versions are ordered newest first
//! by semantic version precedence.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::chart::ChartMetadata;
use crate::error::IndexError;

/// Well-known file name of a repository index.
pub const INDEX_FILE_NAME: &str = "index.yaml";

/// API version written into every index document.
pub const INDEX_API_VERSION: &str = "v1";

/// One published chart version: its metadata plus where to download it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartVersion {
    #[serde(flatten)]
    pub metadata: ChartMetadata,
    #[serde(default)]
    pub urls: Vec<String>,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub removed: bool,
    /// Hex SHA-256 of the chart archive.
    #[serde(default)]
    pub digest: String,
}

impl ChartVersion {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }
}

/// A repository's index of published charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<ChartVersion>>,
    #[serde(default = "Utc::now")]
    pub generated: DateTime<Utc>,
}

fn default_api_version() -> String {
    INDEX_API_VERSION.to_string()
}

impl Default for IndexDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexDocument {
    /// An empty index generated now.
    pub fn new() -> Self {
        Self {
            api_version: default_api_version(),
            entries: BTreeMap::new(),
            generated: Utc::now(),
        }
    }

    /// Record a chart version.
    ///
    /// The download URL is `base_url` joined with `filename`, or just
    /// `filename` when `base_url` is empty.
    pub fn add(
        &mut self,
        mut metadata: ChartMetadata,
        filename: &str,
        base_url: &str,
        digest: impl Into<String>,
    ) {
        if metadata.api_version.is_empty() {
            metadata.api_version = INDEX_API_VERSION.to_string();
        }
        let entry = ChartVersion {
            urls: vec![join_url(base_url, filename)],
            created: Utc::now(),
            removed: false,
            digest: digest.into(),
            metadata,
        };
        self.entries
            .entry(entry.metadata.name.clone())
            .or_default()
            .push(entry);
    }

    /// Whether `name` at `version` is present.
    pub fn has(&self, name: &str, version: &str) -> bool {
        self.get(name, version).is_some()
    }

    /// Look up a single chart version.
    pub fn get(&self, name: &str, version: &str) -> Option<&ChartVersion> {
        self.versions(name).iter().find(|cv| cv.version() == version)
    }

    /// All versions of `name`, in stored order.
    pub fn versions(&self, name: &str) -> &[ChartVersion] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Chart names in lexicographic order.
    pub fn chart_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total number of chart versions across all charts.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Merge `incoming` into `self`; incoming entries win on key collision.
    ///
    /// The generation timestamp becomes the later of the two.
    pub fn merge(&mut self, incoming: IndexDocument) {
        for (name, versions) in incoming.entries {
            let group = self.entries.entry(name).or_default();
            for candidate in versions {
                match group
                    .iter_mut()
                    .find(|existing| existing.version() == candidate.version())
                {
                    Some(existing) => *existing = candidate,
                    None => group.push(candidate),
                }
            }
        }
        if incoming.generated > self.generated {
            self.generated = incoming.generated;
        }
    }

    /// Order every group newest version first.
    pub fn sort_entries(&mut self) {
        for versions in self.entries.values_mut() {
            versions.sort_by(|a, b| newest_first(a.version(), b.version()));
        }
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<Vec<u8>, IndexError> {
        serde_yaml::to_string(self)
            .map(String::into_bytes)
            .map_err(IndexError::Encode)
    }

    /// Parse a YAML index.
    pub fn from_yaml(content: &[u8]) -> Result<Self, IndexError> {
        serde_yaml::from_slice(content).map_err(IndexError::Decode)
    }
}

fn join_url(base_url: &str, filename: &str) -> String {
    if base_url.is_empty() {
        return filename.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        filename.trim_start_matches('/')
    )
}

/// Lenient semantic version parse: optional leading `v`, and missing minor
/// or patch components padded with zeros (`1.2` → `1.2.0`).
fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('v').unwrap_or(raw);
    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }

    let core_end = raw.find(|c: char| c == '-' || c == '+').unwrap_or(raw.len());
    let (core, suffix) = raw.split_at(core_end);
    let parts = core.split('.').count();
    if core.is_empty() || parts >= 3 {
        return None;
    }
    let padded = format!("{core}{}{suffix}", ".0".repeat(3 - parts));
    Version::parse(&padded).ok()
}

/// Descending version order. Parseable versions precede unparseable ones,
/// which fall back to descending string order. Equal semver values spelled
/// differently (`1.2`, `1.2.0`) also fall back to string order.
fn newest_first(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a_ver), Some(b_ver)) => b_ver.cmp(&a_ver).then_with(|| b.cmp(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}
