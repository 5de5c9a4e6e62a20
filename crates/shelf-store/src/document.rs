//! JSON-lines document store.
//!
//! One listing document per line. The whole file is loaded on open and
//! rewritten on every upsert: the new contents go to a sibling temp file
//! which then replaces the original, so readers never see a partial file.

use crate::backend::{ingest_time, RecordStore};
use crate::StoreError;
use async_trait::async_trait;
use shelf_core::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::RwLock;

/// Listings held in memory, optionally persisted to a `.jsonl` file.
pub struct DocumentStore {
    path: Option<PathBuf>,
    listings: RwLock<Vec<Listing>>,
}

impl DocumentStore {
    /// Load a document file. A missing file is an empty store; it is
    /// created on the first upsert.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let listings = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_documents(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(path = %path.display(), listings = listings.len(), "loaded document store");
        Ok(Self {
            path: Some(path),
            listings: RwLock::new(listings),
        })
    }

    /// A store that is never persisted.
    pub fn in_memory() -> Self {
        Self::with_listings(Vec::new())
    }

    /// An unpersisted store seeded with listings, in the given order.
    pub fn with_listings(listings: Vec<Listing>) -> Self {
        Self {
            path: None,
            listings: RwLock::new(listings),
        }
    }

    async fn persist(&self, listings: &[Listing]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut contents = String::new();
        for listing in listings {
            contents.push_str(&serde_json::to_string(listing)?);
            contents.push('\n');
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = temp_path(path);
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::debug!(path = %path.display(), listings = listings.len(), "wrote document store");
        Ok(())
    }
}

fn parse_documents(contents: &str) -> Result<Vec<Listing>, StoreError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| StoreError::Corrupt {
                line: i + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl RecordStore for DocumentStore {
    async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<Listing>, StoreError> {
        let filter = Filter::from_criteria(criteria);
        let listings = self.listings.read().await;
        Ok(filter.select(listings.iter()))
    }

    async fn search_page(&self, query: &SearchQuery) -> Result<Page<Listing>, StoreError> {
        let matching = self.search(&query.criteria).await?;
        Ok(query.paginate(matching))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Listing>, StoreError> {
        if url.trim().is_empty() {
            return Ok(None);
        }
        let listings = self.listings.read().await;
        Ok(listings.iter().find(|l| l.url == url).cloned())
    }

    async fn upsert(&self, keyword: &str, items: &[ListingInput]) -> Result<IngestReport, StoreError> {
        let started = Instant::now();
        let created_at = ingest_time();

        let mut guard = self.listings.write().await;
        let mut listings = guard.clone();
        let mut report = IngestReport {
            received: items.len() as u64,
            ..IngestReport::default()
        };

        for item in items {
            let Some(url) = item.valid_url() else {
                report.skipped += 1;
                continue;
            };

            match listings.iter_mut().find(|l| l.url == url) {
                Some(existing) => existing.apply(item, keyword),
                None => listings.push(Listing::from_input(item, keyword, created_at).map_err(|e| {
                    StoreError::Serialization(e.to_string())
                })?),
            }
            report.saved += 1;
        }

        // Only swap in the new state once it is on disk.
        self.persist(&listings).await?;
        *guard = listings;

        tracing::info!(
            backend = self.backend_name(),
            saved = report.saved,
            skipped = report.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upserted listings"
        );
        Ok(report)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.listings.read().await.len() as u64)
    }

    fn backend_name(&self) -> &'static str {
        "document"
    }
}
