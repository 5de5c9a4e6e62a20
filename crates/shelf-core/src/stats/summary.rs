//! Summary value and its configuration.

use crate::catalog::Listing;
use crate::stats::{BenefitEntry, HistogramBucket, PriceQuantiles, MAX_BINS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Histogram bucket count used when none (or a non-positive one) is given.
pub const DEFAULT_BINS: usize = 30;

/// Ranking length used when none (or a non-positive one) is given.
pub const DEFAULT_TOP_N: usize = 20;

/// Tuning for [`aggregate`](super::aggregate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfig {
    pub bins: usize,
    pub top_n: usize,
}

impl StatsConfig {
    /// Build a config from raw request values. Non-positive values fall back
    /// to the defaults; `bins` is capped at [`MAX_BINS`].
    pub fn new(bins: i64, top_n: i64) -> Self {
        Self {
            bins: positive_or(bins, DEFAULT_BINS).min(MAX_BINS),
            top_n: positive_or(top_n, DEFAULT_TOP_N),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            top_n: DEFAULT_TOP_N,
        }
    }
}

fn positive_or(value: i64, default: usize) -> usize {
    if value <= 0 {
        default
    } else {
        usize::try_from(value).unwrap_or(default)
    }
}

/// Aggregated statistics over a set of listings.
///
/// Absent statistics serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of listings considered.
    pub total: u64,
    /// Listings with a discount price.
    pub discount_count: u64,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Mean over listings with a price.
    pub avg_price: Option<f64>,
    /// Mean over listings with a rating.
    pub avg_rating: Option<f64>,
    pub p25_price: Option<Decimal>,
    pub p50_price: Option<Decimal>,
    pub p75_price: Option<Decimal>,
    pub p90_price: Option<Decimal>,
    pub histogram: Vec<HistogramBucket>,
    pub top_benefit: Vec<BenefitEntry>,
    pub top_sold: Vec<Listing>,
}

impl Summary {
    /// The percentile fields as one value.
    pub fn quantiles(&self) -> PriceQuantiles {
        PriceQuantiles {
            p25: self.p25_price,
            p50: self.p50_price,
            p75: self.p75_price,
            p90: self.p90_price,
        }
    }

    /// Check if no listing matched.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        assert_eq!(StatsConfig::new(0, -3), StatsConfig::default());
        assert_eq!(StatsConfig::new(5, 2), StatsConfig { bins: 5, top_n: 2 });
        assert_eq!(StatsConfig::default().bins, 30);
        assert_eq!(StatsConfig::default().top_n, 20);
    }

    #[test]
    fn test_config_caps_bins() {
        assert_eq!(StatsConfig::new(i64::MAX, 5).bins, MAX_BINS);
        assert_eq!(StatsConfig::new(MAX_BINS as i64 + 1, 5).bins, MAX_BINS);
        assert_eq!(StatsConfig::new(MAX_BINS as i64, 5).bins, MAX_BINS);
    }

    #[test]
    fn test_empty_summary_serializes_nulls() {
        let json = serde_json::to_value(Summary::default()).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["discountCount"], 0);
        assert!(json["minPrice"].is_null());
        assert!(json["avgRating"].is_null());
        assert!(json["p90Price"].is_null());
        assert_eq!(json["histogram"], serde_json::json!([]));
        assert_eq!(json["topBenefit"], serde_json::json!([]));
        assert_eq!(json["topSold"], serde_json::json!([]));
    }
}
