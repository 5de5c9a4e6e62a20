//! Summary aggregation.

use crate::catalog::Listing;
use crate::price;
use crate::stats::{build_histogram, top_benefit, top_sold, Percentiles, StatsConfig, Summary};
use rust_decimal::Decimal;

/// Summarize a complete set of matching listings.
///
/// Pure and total: any input, including an empty one, yields a well-formed
/// summary. Listings lacking a field are skipped by the statistics that need
/// it rather than rejected.
pub fn aggregate(listings: &[Listing], config: StatsConfig) -> Summary {
    let prices: Vec<Decimal> = listings.iter().filter_map(|l| l.price).collect();
    let ratings: Vec<f64> = listings
        .iter()
        .filter_map(|l| l.rating)
        .filter(|r| r.is_finite())
        .collect();

    let percentiles = Percentiles::from_prices(prices);
    let (min_price, max_price) = (percentiles.min(), percentiles.max());
    let quantiles = percentiles.quantiles();

    Summary {
        total: listings.len() as u64,
        discount_count: listings.iter().filter(|l| l.has_discount()).count() as u64,
        min_price,
        max_price,
        avg_price: price::mean(percentiles.sorted()),
        avg_rating: mean(&ratings),
        p25_price: quantiles.p25,
        p50_price: quantiles.p50,
        p75_price: quantiles.p75,
        p90_price: quantiles.p90,
        histogram: build_histogram(percentiles.sorted(), min_price, max_price, config.bins),
        top_benefit: top_benefit(listings, config.top_n),
        top_sold: top_sold(listings, config.top_n),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_means() {
        let listings = vec![
            Listing::new("a", "a", "k").with_price(Decimal::from(10)).with_rating(4.0),
            Listing::new("b", "b", "k").with_rating(2.0).with_discount_price(Decimal::ONE),
            Listing::new("c", "c", "k").with_price(Decimal::from(30)),
        ];

        let summary = aggregate(&listings, StatsConfig::default());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.discount_count, 1);
        assert_eq!(summary.avg_price, Some(20.0));
        assert_eq!(summary.avg_rating, Some(3.0));
        assert_eq!(summary.min_price, Some(Decimal::from(10)));
        assert_eq!(summary.max_price, Some(Decimal::from(30)));
        assert_eq!(summary.histogram.len(), 30);
    }

    #[test]
    fn test_huge_bin_request_still_summarizes() {
        let listings = vec![
            Listing::new("a", "a", "k").with_price(Decimal::from(1)),
            Listing::new("b", "b", "k").with_price(Decimal::from(2)),
        ];

        let summary = aggregate(&listings, StatsConfig::new(i64::MAX, 5));
        assert_eq!(summary.histogram.len(), crate::stats::MAX_BINS);
        assert_eq!(summary.histogram.iter().map(|b| b.count).sum::<u64>(), 2);
    }

    #[test]
    fn test_negative_price_is_tolerated() {
        let listings = vec![
            Listing::new("a", "a", "k").with_price(Decimal::from(-5)).with_rating(5.0),
            Listing::new("b", "b", "k").with_price(Decimal::from(5)).with_rating(5.0),
        ];

        let summary = aggregate(&listings, StatsConfig::new(2, 5));
        assert_eq!(summary.min_price, Some(Decimal::from(-5)));
        assert_eq!(summary.top_benefit.len(), 1);
        assert_eq!(summary.top_benefit[0].product.url, "b");
    }
}
