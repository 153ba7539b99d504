//! Engine configuration.
//!
//! All tunables have defaults matching production behavior; a TOML file can
//! override them. The configuration is read once at startup and treated as
//! immutable afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Tunables for candidate matching and result shaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on store/city disambiguation candidate lists.
    pub max_store_candidates: usize,
    /// Cap on search results returned to the user.
    pub max_search_results: usize,
    /// Prefix length used by the fallback fuzzy store match.
    pub fuzzy_prefix_len: usize,
    /// Cap on the free-text deal notes stored on a report.
    pub max_deal_notes_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_store_candidates: 5,
            max_search_results: 5,
            fuzzy_prefix_len: 3,
            max_deal_notes_len: 240,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_store_candidates, 5);
        assert_eq!(config.max_search_results, 5);
        assert_eq!(config.fuzzy_prefix_len, 3);
    }

    #[test]
    fn test_partial_toml_override() {
        let config = EngineConfig::from_toml_str("max_search_results = 10\n").unwrap();
        assert_eq!(config.max_search_results, 10);
        assert_eq!(config.max_store_candidates, 5);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml_str("max_search_results = ").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "fuzzy_prefix_len = 4\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.fuzzy_prefix_len, 4);

        assert!(EngineConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
