//! Repository client configuration
//!
//! Loaded from YAML. The `schema` subtree is kept untyped and handed to
//! [`Schema`](crate::schema::Schema).

use crate::error::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// REST endpoint settings
    pub rest: RestConfig,
    /// Logical name -> predicate URI / setting mapping
    #[serde(default)]
    pub schema: serde_json::Value,
}

/// REST endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestConfig {
    /// Scheme and host, e.g. `https://repo.example.org`
    pub url_base: String,
    /// Path of the API below the host
    #[serde(default = "default_path_base")]
    pub path_base: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Names of the repository-specific request headers
    #[serde(default)]
    pub headers: HeaderNames,
}

fn default_path_base() -> String {
    "/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Wire names of the repository-specific headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderNames {
    pub metadata_read_mode: String,
    pub metadata_write_mode: String,
    pub metadata_parent_property: String,
    pub transaction_id: String,
}

impl Default for HeaderNames {
    fn default() -> Self {
        Self {
            metadata_read_mode: "X-METADATA-READ-MODE".to_string(),
            metadata_write_mode: "X-METADATA-WRITE-MODE".to_string(),
            metadata_parent_property: "X-PARENT-PROPERTY".to_string(),
            transaction_id: "X-TRANSACTION-ID".to_string(),
        }
    }
}

impl HeaderNames {
    /// Look a header up by its logical (configuration) name
    pub fn get(&self, logical_name: &str) -> Option<&str> {
        match logical_name {
            "metadataReadMode" => Some(&self.metadata_read_mode),
            "metadataWriteMode" => Some(&self.metadata_write_mode),
            "metadataParentProperty" => Some(&self.metadata_parent_property),
            "transactionId" => Some(&self.transaction_id),
            _ => None,
        }
    }
}

impl RepoConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> RepoResult<Self> {
        let config: RepoConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        debug!("Loading repository configuration from {:?}", path);
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    fn validate(&self) -> RepoResult<()> {
        if self.rest.url_base.trim().is_empty() {
            return Err(RepoError::Configuration("rest.urlBase is empty".to_string()));
        }
        if !self.schema.is_object() && !self.schema.is_null() {
            return Err(RepoError::Configuration(
                "schema must be a mapping".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute base URL of the API, always ending with `/`.
    ///
    /// Resource URIs are this prefix followed by the numeric resource id.
    pub fn base_url(&self) -> String {
        let host = self.rest.url_base.trim().trim_end_matches('/');
        let path = self.rest.path_base.trim().trim_matches('/');
        if path.is_empty() {
            format!("{}/", host)
        } else {
            format!("{}/{}/", host, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
rest:
  urlBase: https://repo.example.org/
  pathBase: /api/
  headers:
    metadataReadMode: X-READ
schema:
  id: https://vocab.example.org/hasIdentifier
  search:
    match: search://match
"#;

    #[test]
    fn test_parse_yaml() {
        let config = RepoConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.base_url(), "https://repo.example.org/api/");
        assert_eq!(config.rest.timeout_secs, 30);
        assert_eq!(config.rest.headers.metadata_read_mode, "X-READ");
        // unspecified header names keep their defaults
        assert_eq!(config.rest.headers.metadata_write_mode, "X-METADATA-WRITE-MODE");
        assert_eq!(config.schema["search"]["match"], "search://match");
    }

    #[test]
    fn test_base_url_without_path() {
        let config = RepoConfig::from_yaml_str("rest:\n  urlBase: http://localhost:8080\n").unwrap();
        assert_eq!(config.base_url(), "http://localhost:8080/");
    }

    #[test]
    fn test_header_lookup() {
        let headers = HeaderNames::default();
        assert_eq!(headers.get("transactionId"), Some("X-TRANSACTION-ID"));
        assert_eq!(headers.get("unknown"), None);
    }

    #[test]
    fn test_invalid_config() {
        assert!(RepoConfig::from_yaml_str("rest:\n  urlBase: ''\n").is_err());
        assert!(matches!(
            RepoConfig::from_yaml_str("rest: [1, 2]"),
            Err(RepoError::Yaml(_))
        ));
        assert!(RepoConfig::from_yaml_str("rest:\n  urlBase: http://x\nschema: 12\n").is_err());
    }
}
