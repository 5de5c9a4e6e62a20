//! Top-N rankings.

use crate::catalog::Listing;
use crate::price;
use serde::{Deserialize, Serialize};

/// A listing with its benefit score (rating per unit of price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitEntry {
    pub product: Listing,
    pub benefit: f64,
}

/// Benefit of a listing: `rating / price`, with a missing or non-finite
/// rating counting as zero. `None` unless the price is present and positive.
pub fn benefit(listing: &Listing) -> Option<f64> {
    let price = listing.price.filter(|_| listing.has_positive_price())?;
    let rating = listing.rating.filter(|r| r.is_finite()).unwrap_or(0.0);
    Some(rating / price::to_f64(price))
}

/// The `top_n` listings with the highest benefit, best first.
///
/// Ties keep input order.
pub fn top_benefit(listings: &[Listing], top_n: usize) -> Vec<BenefitEntry> {
    let mut scored: Vec<(&Listing, f64)> = listings
        .iter()
        .filter_map(|listing| benefit(listing).map(|b| (listing, b)))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(top_n)
        .map(|(listing, benefit)| BenefitEntry {
            product: listing.clone(),
            benefit,
        })
        .collect()
}

/// The `top_n` best-selling listings, listings without a sold count
/// excluded. Zero counts are kept. Ties keep input order.
pub fn top_sold(listings: &[Listing], top_n: usize) -> Vec<Listing> {
    let mut sold: Vec<(&Listing, u64)> = listings
        .iter()
        .filter_map(|listing| listing.sold.map(|s| (listing, s)))
        .collect();

    sold.sort_by(|a, b| b.1.cmp(&a.1));

    sold.into_iter()
        .take(top_n)
        .map(|(listing, _)| listing.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn listing(url: &str) -> Listing {
        Listing::new(url, url, "k")
    }

    fn urls(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.url.as_str()).collect()
    }

    #[test]
    fn test_benefit_requires_positive_price() {
        assert_eq!(benefit(&listing("a")), None);
        assert_eq!(benefit(&listing("a").with_price(Decimal::ZERO)), None);
        assert_eq!(benefit(&listing("a").with_price(Decimal::from(-5))), None);
        assert_eq!(benefit(&listing("a").with_price(Decimal::from(10))), Some(0.0));
        assert_eq!(
            benefit(&listing("a").with_price(Decimal::from(10)).with_rating(4.0)),
            Some(0.4)
        );
    }

    #[test]
    fn test_non_finite_rating_counts_as_zero() {
        let nan = listing("nan").with_price(Decimal::from(10)).with_rating(f64::NAN);
        let inf = listing("inf").with_price(Decimal::from(10)).with_rating(f64::INFINITY);
        assert_eq!(benefit(&nan), Some(0.0));
        assert_eq!(benefit(&inf), Some(0.0));

        let rated = listing("rated").with_price(Decimal::from(10)).with_rating(1.0);
        let top = top_benefit(&[nan, rated, inf], 3);
        assert_eq!(top[0].product.url, "rated");
        assert!(top.iter().all(|entry| entry.benefit.is_finite()));
    }

    #[test]
    fn test_top_benefit_order_and_limit() {
        let listings = vec![
            listing("low").with_price(Decimal::from(100)).with_rating(1.0),
            listing("high").with_price(Decimal::from(1)).with_rating(5.0),
            listing("free").with_price(Decimal::ZERO).with_rating(5.0),
            listing("mid").with_price(Decimal::from(10)).with_rating(5.0),
        ];

        let top = top_benefit(&listings, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product.url, "high");
        assert_eq!(top[1].product.url, "mid");
        assert!(top[0].benefit >= top[1].benefit);
    }

    #[test]
    fn test_top_benefit_ties_keep_input_order() {
        let listings = vec![
            listing("first").with_price(Decimal::from(2)).with_rating(4.0),
            listing("second").with_price(Decimal::from(1)).with_rating(2.0),
        ];
        let top = top_benefit(&listings, 5);
        assert_eq!(top[0].product.url, "first");
        assert_eq!(top[1].product.url, "second");
    }

    #[test]
    fn test_top_sold() {
        let listings = vec![
            listing("none"),
            listing("zero").with_sold(0),
            listing("ten").with_sold(10),
            listing("five").with_sold(5),
            listing("ten-again").with_sold(10),
        ];

        assert_eq!(urls(&top_sold(&listings, 10)), vec!["ten", "ten-again", "five", "zero"]);
        assert_eq!(urls(&top_sold(&listings, 1)), vec!["ten"]);
    }
}
