//! Stats module.
//!
//! Percentiles, the price histogram, top-N rankings and the aggregator that
//! folds them into one [`Summary`].

mod aggregator;
mod histogram;
mod percentile;
mod ranking;
mod summary;

pub use aggregator::aggregate;
pub use histogram::{build_histogram, HistogramBucket, MAX_BINS};
pub use percentile::{Percentiles, PriceQuantiles};
pub use ranking::{benefit, top_benefit, top_sold, BenefitEntry};
pub use summary::{StatsConfig, Summary, DEFAULT_BINS, DEFAULT_TOP_N};
