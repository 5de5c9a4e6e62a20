//! Listing domain types and the statistics engine for shelf.
//!
//! This crate provides the pure, storage-agnostic parts of the system:
//!
//! - **Catalog**: Listing snapshots and the ingest payload types
//! - **Search**: Filter criteria, the combined predicate, sorting and pagination
//! - **Stats**: Percentiles, price histogram, top-N rankings and the aggregator
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_core::prelude::*;
//!
//! let criteria = FilterCriteria::new()
//!     .with_keyword("phone")
//!     .with_price(Some(Decimal::from(100)), None);
//!
//! let filter = Filter::from_criteria(&criteria);
//! let matching: Vec<Listing> = listings.into_iter().filter(|l| filter.matches(l)).collect();
//!
//! let summary = aggregate(&matching, StatsConfig::new(20, 10));
//! println!("median price: {:?}", summary.p50_price);
//! ```

pub mod error;
pub mod ids;
pub mod price;

pub mod catalog;
pub mod search;
pub mod stats;

pub use error::ListingError;
pub use ids::ListingId;
pub use rust_decimal::Decimal;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::ListingError;
    pub use crate::ids::ListingId;
    pub use rust_decimal::Decimal;

    // Catalog
    pub use crate::catalog::{IngestBatch, IngestReport, Listing, ListingInput};

    // Search
    pub use crate::search::{
        Bounds, Filter, FilterCriteria, Page, Pagination, Predicate, SearchQuery, SortOption,
    };

    // Stats
    pub use crate::stats::{
        aggregate, BenefitEntry, HistogramBucket, PriceQuantiles, StatsConfig, Summary,
    };
}
