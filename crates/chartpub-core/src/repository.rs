//! # Repositories and the Repository Registry
//!
//! A repository is a named location in the object store: a bucket plus a
//! directory prefix inside it. Every chart published to the repository is
//! stored under that prefix, next to the repository's single `index.yaml`.
//!
//! The registry is built once from configuration and is read-only
//! afterwards, so lookups need no locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::index::INDEX_FILE_NAME;

/// Storage coordinates of one chart repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Name clients use to address the repository (e.g. `stable`).
    pub name: String,
    /// Bucket holding the repository's objects.
    pub bucket: String,
    /// Prefix under which charts and the index are stored. May be empty.
    #[serde(default)]
    pub directory: String,
}

impl Repository {
    /// Create a repository definition.
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
            directory: directory.into(),
        }
    }

    /// Object path of `filename` inside this repository.
    ///
    /// Leading and trailing slashes on the directory are ignored, so
    /// `"charts/"` and `"/charts"` both yield `charts/<filename>`.
    pub fn path(&self, filename: &str) -> String {
        let directory = self.directory.trim_matches('/');
        let filename = filename.trim_start_matches('/');
        if directory.is_empty() {
            filename.to_string()
        } else {
            format!("{directory}/{filename}")
        }
    }

    /// Object path of this repository's index document.
    pub fn index_path(&self) -> String {
        self.path(INDEX_FILE_NAME)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::Invalid {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.name.contains('/') {
            return Err(invalid("name must not contain '/'"));
        }
        if self.bucket.trim().is_empty() {
            return Err(invalid("bucket must not be empty"));
        }
        let directory = self.directory.trim_matches('/');
        if !directory.is_empty()
            && directory
                .split('/')
                .any(|segment| matches!(segment, "" | "." | "..") || segment.contains('\\'))
        {
            return Err(invalid(
                "directory must be a relative path without empty, '.' or '..' segments",
            ));
        }
        Ok(())
    }
}

/// Immutable name → repository mapping, resolved at load time.
#[derive(Debug, Clone, Default)]
pub struct RepositoryRegistry {
    repositories: HashMap<String, Repository>,
}

impl RepositoryRegistry {
    /// Build a registry, rejecting invalid definitions and duplicate names.
    pub fn new(repositories: impl IntoIterator<Item = Repository>) -> Result<Self, RegistryError> {
        let mut by_name = HashMap::new();
        for repository in repositories {
            repository.validate()?;
            if by_name.contains_key(&repository.name) {
                return Err(RegistryError::Duplicate(repository.name));
            }
            by_name.insert(repository.name.clone(), repository);
        }
        Ok(Self {
            repositories: by_name,
        })
    }

    /// Look up a repository by name.
    pub fn get(&self, name: &str) -> Result<&Repository, RegistryError> {
        self.repositories
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Iterate over all repositories, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        let mut repositories: Vec<&Repository> = self.repositories.values().collect();
        repositories.sort_by(|a, b| a.name.cmp(&b.name));
        repositories.into_iter()
    }

    /// Number of configured repositories.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether no repositories are configured.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
