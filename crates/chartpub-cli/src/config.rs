//! # Configuration
//!
//! Loaded once at startup from a YAML file:
//!
//! ```yaml
//! listen: 0.0.0.0:8080
//! max_chart_bytes: 33554432
//! storage_timeout_secs: 30
//! storage:
//!   type: filesystem
//!   root: /var/lib/chartpub
//!   base_url: https://charts.example.com
//! repositories:
//!   - name: stable
//!     bucket: charts
//!     directory: stable
//! ```
//!
//! Every field except `repositories` has a default.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chartpub_core::{RegistryError, Repository, RepositoryRegistry};
use chartpub_publisher::{Publisher, PublisherConfig};
use chartpub_store::StorageConfig;
use serde::{Deserialize, Serialize};

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_max_chart_bytes() -> usize {
    chartpub_api::state::DEFAULT_MAX_CHART_BYTES
}

fn default_storage_timeout_secs() -> u64 {
    30
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    #[serde(default = "default_max_chart_bytes")]
    pub max_chart_bytes: usize,
    #[serde(default = "default_storage_timeout_secs")]
    pub storage_timeout_secs: u64,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Validate the repository list into a registry.
    pub fn registry(&self) -> Result<RepositoryRegistry, RegistryError> {
        RepositoryRegistry::new(self.repositories.iter().cloned())
    }

    pub fn publisher_config(&self) -> PublisherConfig {
        PublisherConfig {
            storage_timeout: Duration::from_secs(self.storage_timeout_secs),
        }
    }

    /// Build a publisher over the configured storage backend.
    pub fn build_publisher(&self) -> anyhow::Result<Publisher> {
        let registry = self.registry().context("invalid repository configuration")?;
        if registry.is_empty() {
            tracing::warn!("no repositories configured");
        }
        let store = self.storage.build();
        tracing::debug!(
            storage = self.storage.kind(),
            repositories = registry.len(),
            "building publisher"
        );
        Ok(Publisher::with_config(registry, store, self.publisher_config()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml(
            "repositories:\n  - name: stable\n    bucket: charts\n",
        )
        .unwrap();
        assert_eq!(config.listen, default_listen());
        assert_eq!(config.max_chart_bytes, 32 * 1024 * 1024);
        assert_eq!(config.storage_timeout_secs, 30);
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.repositories, [Repository::new("stable", "charts", "")]);
    }

    #[test]
    fn full_config_parses() {
        let config = Config::from_yaml(
            r#"
listen: 0.0.0.0:9000
max_chart_bytes: 1024
storage_timeout_secs: 5
storage:
  type: filesystem
  root: /var/lib/chartpub
  base_url: https://charts.example.com
repositories:
  - name: stable
    bucket: charts
    directory: stable
  - name: incubator
    bucket: charts
    directory: incubator
"#,
        )
        .unwrap();
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.publisher_config().storage_timeout, Duration::from_secs(5));
        assert_eq!(config.storage.kind(), "filesystem");

        let registry = config.registry().unwrap();
        assert_eq!(registry.get("incubator").unwrap().directory, "incubator");
    }

    #[test]
    fn duplicate_repositories_are_rejected() {
        let config = Config::from_yaml(
            "repositories:\n  - {name: stable, bucket: a}\n  - {name: stable, bucket: b}\n",
        )
        .unwrap();
        assert!(matches!(config.registry(), Err(RegistryError::Duplicate(_))));
        assert!(config.build_publisher().is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_yaml("listen: 127.0.0.1:1\nlisten_port: 80\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
