//! # Chart Metadata
//!
//! The contents of a chart's `Chart.yaml`. Only `name` and `version` matter
//! to the index (they form the merge key); every other field is carried
//! through to the index entry untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A chart maintainer as listed in `Chart.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Metadata extracted from a packaged chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// Chart API version. Defaults to `v1` when the chart omits it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<Maintainer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ChartMetadata {
    /// Minimal metadata with just a name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            api_version: "v1".to_string(),
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the application version.
    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = Some(app_version.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_chart_yaml() {
        let yaml = r#"
apiVersion: v1
name: nginx
version: 1.2.3
appVersion: "1.25"
description: A web server
keywords: [web, proxy]
maintainers:
  - name: ops
    email: ops@example.com
annotations:
  category: Infrastructure
"#;
        let md: ChartMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(md.name, "nginx");
        assert_eq!(md.version, "1.2.3");
        assert_eq!(md.app_version.as_deref(), Some("1.25"));
        assert_eq!(md.keywords, ["web", "proxy"]);
        assert_eq!(md.maintainers[0].email.as_deref(), Some("ops@example.com"));
        assert_eq!(md.annotations["category"], "Infrastructure");
        assert!(!md.deprecated);
    }

    #[test]
    fn omits_empty_fields_when_serialized() {
        let md = ChartMetadata::new("foo", "1.0.0");
        let yaml = serde_yaml::to_string(&md).unwrap();
        assert!(yaml.contains("apiVersion: v1"));
        assert!(!yaml.contains("keywords"));
        assert!(!yaml.contains("deprecated"));
        assert!(!yaml.contains("description"));
    }
}
