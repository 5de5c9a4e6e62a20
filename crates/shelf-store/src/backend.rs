//! The record store abstraction and backend selection.

use crate::{DocumentStore, SqliteStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_core::prelude::*;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Persistent collection of listings.
///
/// Implementations must agree on every observable result: the same
/// criteria select the same listings in the same order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every listing matching the criteria, in insertion order.
    async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<Listing>, StoreError>;

    /// One sorted page of matching listings.
    ///
    /// Listings missing the sort field come last; ties keep insertion order.
    async fn search_page(&self, query: &SearchQuery) -> Result<Page<Listing>, StoreError>;

    /// Look up a listing by url. A blank url finds nothing.
    async fn find_by_url(&self, url: &str) -> Result<Option<Listing>, StoreError>;

    /// Insert or update listings by url.
    ///
    /// Items without a url are skipped. Updated listings keep their id and
    /// creation time; `keyword` overwrites the stored keyword.
    async fn upsert(&self, keyword: &str, items: &[ListingInput]) -> Result<IngestReport, StoreError>;

    /// Total number of stored listings.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Available backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Document,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Sqlite => "sqlite",
            StoreKind::Document => "document",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Some(StoreKind::Sqlite),
            "document" | "jsonl" => Some(StoreKind::Document),
            _ => None,
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how listings are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to open.
    #[serde(default)]
    pub backend: StoreKind,

    /// SQLite database file.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    /// JSON-lines document file.
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("data/shelf.db")
}

fn default_document_path() -> PathBuf {
    PathBuf::from("data/listings.jsonl")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreKind::default(),
            sqlite_path: default_sqlite_path(),
            document_path: default_document_path(),
        }
    }
}

impl StoreConfig {
    /// Path of the configured backend's storage.
    pub fn active_path(&self) -> &PathBuf {
        match self.backend {
            StoreKind::Sqlite => &self.sqlite_path,
            StoreKind::Document => &self.document_path,
        }
    }
}

/// Open the backend named by the configuration.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreKind::Sqlite => Arc::new(SqliteStore::open(&config.sqlite_path)?),
        StoreKind::Document => Arc::new(DocumentStore::open(&config.document_path).await?),
    };

    tracing::info!(
        backend = store.backend_name(),
        path = %config.active_path().display(),
        "opened record store"
    );
    Ok(store)
}

/// Creation time for newly ingested listings.
///
/// Truncated to whole milliseconds, the resolution every backend keeps.
pub(crate) fn ingest_time() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.backend, StoreKind::Sqlite);
        assert_eq!(config.active_path(), &PathBuf::from("data/shelf.db"));
    }

    #[test]
    fn test_store_kind_names() {
        let config: StoreConfig = serde_json::from_str(r#"{"backend": "document"}"#).unwrap();
        assert_eq!(config.backend, StoreKind::Document);
        assert_eq!(StoreKind::from_str("SQLite"), Some(StoreKind::Sqlite));
        assert_eq!(StoreKind::from_str("mongo"), None);
        assert_eq!(StoreKind::Document.to_string(), "document");
    }

    #[test]
    fn test_ingest_time_has_millisecond_resolution() {
        assert_eq!(ingest_time().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn test_open_store_selects_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreKind::Document,
            sqlite_path: dir.path().join("shelf.db"),
            document_path: dir.path().join("listings.jsonl"),
        };
        assert_eq!(open_store(&config).await.unwrap().backend_name(), "document");

        let config = StoreConfig {
            backend: StoreKind::Sqlite,
            ..config
        };
        assert_eq!(open_store(&config).await.unwrap().backend_name(), "sqlite");
    }
}
