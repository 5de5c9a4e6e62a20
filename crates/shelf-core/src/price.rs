//! Price helpers.
//!
//! Prices are `rust_decimal::Decimal` values so that min/max, percentiles and
//! histogram edges are computed without binary floating-point drift. Only the
//! means and the benefit score leave decimal space, as `f64`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert a price to `f64` for float-valued statistics.
pub fn to_f64(price: Decimal) -> f64 {
    price.to_f64().unwrap_or(0.0)
}

/// Convert an `f64` back into a price, `None` for NaN or infinities.
pub fn from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Parse a user-supplied price.
///
/// Accepts plain decimal notation (`"49.99"`, `"1200"`) and scientific
/// notation (`"1.2e3"`). Returns `None` for anything else.
pub fn parse(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Format a price with a fixed number of decimal places (e.g. "49.99").
pub fn display(price: Decimal, places: u32) -> String {
    let rounded = price.round_dp(places);
    format!("{:.places$}", rounded, places = places as usize)
}

/// Mean of a set of prices, computed in decimal space and returned as `f64`.
///
/// Falls back to a float sum if the decimal sum overflows.
pub fn mean(prices: &[Decimal]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    let n = prices.len();
    let exact = prices
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p))
        .and_then(|sum| sum.checked_div(Decimal::from(n)));

    match exact {
        Some(avg) => Some(to_f64(avg)),
        None => Some(prices.iter().map(|p| to_f64(*p)).sum::<f64>() / n as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_scientific() {
        assert_eq!(parse("49.99"), Some(Decimal::new(4999, 2)));
        assert_eq!(parse(" 1200 "), Some(Decimal::from(1200)));
        assert_eq!(parse("1.2e3"), Some(Decimal::from(1200)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("cheap"), None);
        assert_eq!(parse("12,50"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(display(Decimal::new(4999, 2), 2), "49.99");
        assert_eq!(display(Decimal::from(15), 2), "15.00");
        assert_eq!(display(Decimal::new(33333, 4), 2), "3.33");
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        let avg = mean(&[Decimal::from(10), Decimal::from(20)]).unwrap();
        assert!((avg - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_float_round_trip() {
        assert_eq!(to_f64(Decimal::new(25, 2)), 0.25);
        assert_eq!(from_f64(f64::NAN), None);
    }
}
