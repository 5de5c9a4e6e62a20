//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shelf_core::search::DEFAULT_PER_PAGE;
use shelf_core::stats::{DEFAULT_BINS, DEFAULT_TOP_N};
use shelf_store::StoreConfig;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["shelf.toml", ".shelf.toml", "shelf.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Record store selection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Statistics defaults.
    #[serde(default)]
    pub stats: StatsSection,

    /// Search defaults.
    #[serde(default)]
    pub search: SearchSection,

    /// Logging.
    #[serde(default)]
    pub log: LogSection,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Statistics defaults. Non-positive values mean "use the built-in default".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSection {
    /// Histogram bucket count.
    #[serde(default = "default_bins")]
    pub bins: i64,

    /// Ranking length.
    #[serde(default = "default_top_n")]
    pub top_n: i64,
}

fn default_bins() -> i64 {
    DEFAULT_BINS as i64
}

fn default_top_n() -> i64 {
    DEFAULT_TOP_N as i64
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            top_n: default_top_n(),
        }
    }
}

/// Search defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Page size.
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    /// Level or filter directive (e.g. "info", "shelf_store=debug").
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Generate a default shelf.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Shelf configuration

[store]
# "sqlite" or "document"
backend = "sqlite"
sqlite_path = "data/shelf.db"
document_path = "data/listings.jsonl"

[stats]
# Values <= 0 fall back to the defaults
bins = {bins}
top_n = {top_n}

[search]
per_page = {per_page}

[log]
# error, warn, info, debug or trace
level = "info"
"#,
        bins = DEFAULT_BINS,
        top_n = DEFAULT_TOP_N,
        per_page = DEFAULT_PER_PAGE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_store::StoreKind;

    #[test]
    fn test_default_file_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: CliConfig = toml::from_str(
            r#"
            [store]
            backend = "document"

            [stats]
            bins = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreKind::Document);
        assert_eq!(config.stats.bins, 10);
        assert_eq!(config.stats.top_n, 20);
        assert_eq!(config.search.per_page, 20);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.json");

        let mut config = CliConfig::default();
        config.search.per_page = 50;
        config.save(&path).unwrap();

        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.toml");
        std::fs::write(&path, "[store]\nbackend = \"mongo\"\n").unwrap();

        assert!(CliConfig::load(&path).is_err());
    }
}
