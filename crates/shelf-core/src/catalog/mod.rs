//! Catalog module.
//!
//! Contains listing snapshots and the ingest payload types.

mod listing;

pub use listing::{IngestBatch, IngestReport, Listing, ListingInput};
