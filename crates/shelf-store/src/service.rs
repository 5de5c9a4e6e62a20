//! Listing service: the operations the CLI exposes, over any record store.

use crate::{RecordStore, StoreError};
use shelf_core::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors surfaced by the listing service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The record store failed; no partial result is returned.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The request was rejected before reaching the store.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ListingError> for ServiceError {
    fn from(e: ListingError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

/// Statistics, search, lookup and ingestion over one record store.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn RecordStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Summarize every listing matching the criteria.
    pub async fn stats(&self, criteria: &FilterCriteria, config: StatsConfig) -> Result<Summary, ServiceError> {
        let started = Instant::now();
        let listings = self.store.search(criteria).await?;
        let summary = aggregate(&listings, config);

        tracing::info!(
            backend = self.store.backend_name(),
            matched = summary.total,
            bins = config.bins,
            top_n = config.top_n,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "computed stats"
        );
        Ok(summary)
    }

    /// One sorted page of matching listings.
    pub async fn search(&self, query: &SearchQuery) -> Result<Page<Listing>, ServiceError> {
        let started = Instant::now();
        let page = self.store.search_page(query).await?;

        tracing::info!(
            backend = self.store.backend_name(),
            total = page.pagination.total,
            page = query.page,
            sort = query.sort.display_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "searched listings"
        );
        Ok(page)
    }

    pub async fn find_by_url(&self, url: &str) -> Result<Option<Listing>, ServiceError> {
        Ok(self.store.find_by_url(url).await?)
    }

    /// Store a scraped batch.
    pub async fn ingest(&self, batch: &IngestBatch) -> Result<IngestReport, ServiceError> {
        batch.validate()?;

        let mut report = self.store.upsert(batch.keyword.trim(), &batch.items).await?;
        report.received = batch.received();

        tracing::info!(
            backend = self.store.backend_name(),
            keyword = %batch.keyword,
            received = report.received,
            saved = report.saved,
            skipped = report.skipped,
            "ingested batch"
        );
        Ok(report)
    }
}
