//! Configuration loading and management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{BookDraft, MemberDraft};

/// Application configuration
///
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind: String,

    /// Path of the persisted session blob
    pub state_path: PathBuf,

    /// Buffer size for the change-event broadcast channel
    pub event_capacity: usize,

    /// Optional seed file loaded into the catalog at startup
    pub seed_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            state_path: PathBuf::from("shelf_session.json"),
            event_capacity: 1024,
            seed_path: None,
        }
    }
}

/// Errors from loading configuration or seed files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

/// Records loaded into the catalog at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub books: Vec<BookDraft>,
    pub members: Vec<MemberDraft>,
}

impl SeedData {
    /// Load seed records from a YAML file
    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let seed: Self = serde_yaml::from_str(&content)?;
        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_all_defaults() {
        let config = AppConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_yaml_overrides_defaults() {
        let config = AppConfig::from_yaml_str("bind: 0.0.0.0:8080\nevent_capacity: 64\n").unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.event_capacity, 64);
        assert_eq!(config.state_path, PathBuf::from("shelf_session.json"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(AppConfig::from_yaml_str("bind: [unclosed").is_err());
    }

    #[test]
    fn test_seed_data_parses() {
        let yaml = r#"
books:
  - title: Kokoro
    author: Natsume Soseki
    genre: Fiction
    published_year: 1914
    available: true
members:
  - name: Aiko Tanaka
    email: aiko@example.com
    joined_year: 2021
    active: true
"#;
        let seed: SeedData = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seed.books.len(), 1);
        assert_eq!(seed.members.len(), 1);
        assert_eq!(seed.books[0].title, "Kokoro");
    }
}
