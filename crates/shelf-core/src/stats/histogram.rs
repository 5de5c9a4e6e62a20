//! Equal-width price histogram.
//!
//! Buckets are inclusive-low: a price sitting exactly on an interior edge
//! belongs to the bucket that starts there. The last bucket is closed on
//! both ends and its `end` is exactly the maximum price.

use crate::price;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest bucket count a histogram is built with. Larger requests are
/// clamped to it.
pub const MAX_BINS: usize = 1_000;

/// One interval of the price histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub start: Decimal,
    pub end: Decimal,
    pub count: u64,
}

impl HistogramBucket {
    pub fn new(start: Decimal, end: Decimal, count: u64) -> Self {
        Self { start, end, count }
    }
}

/// Bucket `prices` into `bins` equal-width intervals between `min` and `max`.
///
/// Returns no buckets when either bound is absent, and a single bucket
/// holding every price when `min == max`. `bins` is clamped to
/// `1..=MAX_BINS`.
pub fn build_histogram(
    prices: &[Decimal],
    min: Option<Decimal>,
    max: Option<Decimal>,
    bins: usize,
) -> Vec<HistogramBucket> {
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        _ => return Vec::new(),
    };

    if max == min {
        return vec![HistogramBucket::new(min, max, prices.len() as u64)];
    }

    let bins = bins.clamp(1, MAX_BINS);
    let range = max - min;

    let mut counts = vec![0u64; bins];
    for value in prices {
        counts[bucket_index(*value, min, range, bins)] += 1;
    }

    let mut buckets = Vec::with_capacity(bins);
    let mut start = min;
    for (i, count) in counts.into_iter().enumerate() {
        let end = if i + 1 == bins {
            max
        } else {
            edge(min, range, i + 1, bins)
        };
        buckets.push(HistogramBucket::new(start, end, count));
        start = end;
    }
    buckets
}

/// `floor((value - min) * bins / range)` clamped to `[0, bins - 1]`.
fn bucket_index(value: Decimal, min: Decimal, range: Decimal, bins: usize) -> usize {
    let exact = value
        .checked_sub(min)
        .and_then(|offset| offset.checked_mul(Decimal::from(bins)))
        .and_then(|scaled| scaled.checked_div(range))
        .map(|position| position.floor().to_i64().unwrap_or(0));

    let position = exact.unwrap_or_else(|| {
        let offset = price::to_f64(value) - price::to_f64(min);
        (offset / price::to_f64(range) * bins as f64).floor() as i64
    });

    position.clamp(0, bins as i64 - 1) as usize
}

/// Start of bucket `i`: `min + range * i / bins`.
fn edge(min: Decimal, range: Decimal, i: usize, bins: usize) -> Decimal {
    let i = Decimal::from(i);
    let bins = Decimal::from(bins);

    range
        .checked_mul(i)
        .and_then(|scaled| scaled.checked_div(bins))
        .or_else(|| range.checked_div(bins).and_then(|width| width.checked_mul(i)))
        .and_then(|offset| min.checked_add(offset))
        .unwrap_or(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn counts(buckets: &[HistogramBucket]) -> Vec<u64> {
        buckets.iter().map(|b| b.count).collect()
    }

    #[test]
    fn test_no_bounds_no_buckets() {
        assert!(build_histogram(&[], None, None, 10).is_empty());
        assert!(build_histogram(&[d(1)], Some(d(1)), None, 10).is_empty());
    }

    #[test]
    fn test_degenerate_range_is_one_bucket() {
        let prices = [d(7), d(7), d(7)];
        let buckets = build_histogram(&prices, Some(d(7)), Some(d(7)), 30);
        assert_eq!(buckets, vec![HistogramBucket::new(d(7), d(7), 3)]);
    }

    #[test]
    fn test_two_buckets() {
        let buckets = build_histogram(&[d(10), d(20)], Some(d(10)), Some(d(20)), 2);
        assert_eq!(
            buckets,
            vec![
                HistogramBucket::new(d(10), d(15), 1),
                HistogramBucket::new(d(15), d(20), 1),
            ]
        );
    }

    #[test]
    fn test_interior_edge_goes_to_upper_bucket() {
        let prices = [d(0), d(10), d(20), d(30)];
        let buckets = build_histogram(&prices, Some(d(0)), Some(d(30)), 3);
        assert_eq!(counts(&buckets), vec![1, 1, 2]);
        assert_eq!(buckets[1].start, d(10));
    }

    #[test]
    fn test_fractional_edges_are_exact() {
        // 0.1 on a 0.1-wide grid must land in bucket 1, not bucket 0.
        let prices = [Decimal::ZERO, Decimal::new(1, 1), Decimal::new(3, 1)];
        let buckets = build_histogram(&prices, Some(Decimal::ZERO), Some(Decimal::new(3, 1)), 3);
        assert_eq!(counts(&buckets), vec![1, 1, 1]);
        assert_eq!(buckets[1].start, Decimal::new(1, 1));
        assert_eq!(buckets[2].end, Decimal::new(3, 1));
    }

    #[test]
    fn test_bin_count_is_clamped() {
        let prices = [d(1), d(2)];
        assert_eq!(build_histogram(&prices, Some(d(1)), Some(d(2)), 0).len(), 1);

        let buckets = build_histogram(&prices, Some(d(1)), Some(d(2)), usize::MAX);
        assert_eq!(buckets.len(), MAX_BINS);
        assert_eq!(counts(&buckets).iter().sum::<u64>(), 2);
        assert_eq!(buckets.last().unwrap().end, d(2));
    }

    #[test]
    fn test_edges_are_contiguous_and_end_at_max() {
        let prices = [d(1), d(2), d(3), d(5), d(8), d(13)];
        let buckets = build_histogram(&prices, Some(d(1)), Some(d(13)), 7);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets.first().unwrap().start, d(1));
        assert_eq!(buckets.last().unwrap().end, d(13));
        for pair in buckets.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].start <= pair[0].end);
        }
        assert_eq!(counts(&buckets).iter().sum::<u64>(), prices.len() as u64);
    }
}
