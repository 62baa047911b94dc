//! Storage backend selection from configuration.
//!
//! ```yaml
//! storage:
//!   type: filesystem
//!   root: /var/lib/chartpub
//!   base_url: https://charts.example.com
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fs::FilesystemStore;
use crate::memory::MemoryStore;
use crate::traits::Storage;

/// Which backend to use and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Non-persistent, process-local storage.
    Memory {
        #[serde(default)]
        base_url: String,
    },
    /// Files under a local directory.
    Filesystem {
        root: PathBuf,
        #[serde(default)]
        base_url: String,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Memory {
            base_url: String::new(),
        }
    }
}

impl StorageConfig {
    /// Instantiate the configured backend.
    pub fn build(&self) -> Arc<dyn Storage> {
        match self {
            Self::Memory { base_url } => Arc::new(MemoryStore::new(base_url.clone())),
            Self::Filesystem { root, base_url } => {
                Arc::new(FilesystemStore::new(root.clone(), base_url.clone()))
            }
        }
    }

    /// Short backend name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory { .. } => "memory",
            Self::Filesystem { .. } => "filesystem",
        }
    }
}
