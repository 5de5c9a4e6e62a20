//! Linear-interpolation percentiles over prices.

use crate::price;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prices sorted once, ready for any number of percentile lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Percentiles {
    sorted: Vec<Decimal>,
}

impl Percentiles {
    /// Sort the given prices ascending.
    pub fn from_prices(prices: impl IntoIterator<Item = Decimal>) -> Self {
        let mut sorted: Vec<Decimal> = prices.into_iter().collect();
        sorted.sort();
        Self { sorted }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// The sorted prices.
    pub fn sorted(&self) -> &[Decimal] {
        &self.sorted
    }

    pub fn min(&self) -> Option<Decimal> {
        self.sorted.first().copied()
    }

    pub fn max(&self) -> Option<Decimal> {
        self.sorted.last().copied()
    }

    /// Percentile for a fraction `p` in `[0, 1]`.
    ///
    /// Out-of-range fractions are clamped. `None` only when there are no
    /// prices.
    pub fn percentile(&self, p: f64) -> Option<Decimal> {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let fraction = price::from_f64(p).unwrap_or(Decimal::ZERO);
        self.at(fraction)
    }

    /// Percentile for an exact decimal fraction, clamped to `[0, 1]`.
    ///
    /// `idx = p * (n - 1)`; the result interpolates between the values at
    /// `floor(idx)` and `ceil(idx)`.
    pub fn at(&self, p: Decimal) -> Option<Decimal> {
        let n = self.sorted.len();
        match n {
            0 => return None,
            1 => return Some(self.sorted[0]),
            _ => {}
        }

        let p = p.clamp(Decimal::ZERO, Decimal::ONE);
        let idx = p * Decimal::from(n - 1);
        let lo = idx.floor();
        let hi = idx.ceil();
        let weight = idx - lo;

        let lo_value = self.sorted[index(lo, n)];
        let hi_value = self.sorted[index(hi, n)];

        let exact = hi_value
            .checked_sub(lo_value)
            .and_then(|span| span.checked_mul(weight))
            .and_then(|offset| lo_value.checked_add(offset));

        Some(exact.unwrap_or_else(|| {
            let lo_f = price::to_f64(lo_value);
            let hi_f = price::to_f64(hi_value);
            let w = weight.to_f64().unwrap_or(0.0);
            price::from_f64(lo_f + w * (hi_f - lo_f)).unwrap_or(lo_value)
        }))
    }

    /// The four quartile-style cut points reported in a summary.
    pub fn quantiles(&self) -> PriceQuantiles {
        PriceQuantiles {
            p25: self.at(Decimal::new(25, 2)),
            p50: self.at(Decimal::new(50, 2)),
            p75: self.at(Decimal::new(75, 2)),
            p90: self.at(Decimal::new(90, 2)),
        }
    }
}

fn index(position: Decimal, n: usize) -> usize {
    position.to_usize().unwrap_or(0).min(n - 1)
}

/// p25/p50/p75/p90 of a price set. All absent when there are no prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuantiles {
    pub p25: Option<Decimal>,
    pub p50: Option<Decimal>,
    pub p75: Option<Decimal>,
    pub p90: Option<Decimal>,
}
