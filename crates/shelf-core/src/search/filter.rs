//! Predicates and the combined filter.
//!
//! Each present criterion becomes one [`Predicate`]. The filter is the AND of
//! whatever predicates exist; with none it admits every listing.

use crate::catalog::Listing;
use crate::search::{Bounds, FilterCriteria};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single active constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Predicate {
    /// Lowercased substring of title or keyword.
    Keyword(String),
    /// Price range. Listings without a price fail.
    Price(Bounds<Decimal>),
    /// Rating range. Listings without a rating fail.
    Rating(Bounds<f64>),
    /// Listing has a discount price.
    OnDiscount,
    /// Units-sold range. Listings without a sold count fail.
    Sold(Bounds<u64>),
    /// Creation time range.
    Created(Bounds<DateTime<Utc>>),
}

impl Predicate {
    /// Keyword predicate, `None` for a blank keyword.
    pub fn keyword(keyword: &str) -> Option<Self> {
        if keyword.trim().is_empty() {
            return None;
        }
        Some(Predicate::Keyword(fold_case(keyword)))
    }

    /// Price predicate, `None` when unbounded.
    pub fn price(bounds: Bounds<Decimal>) -> Option<Self> {
        (!bounds.is_unbounded()).then_some(Predicate::Price(bounds))
    }

    /// Rating predicate, `None` when unbounded.
    pub fn rating(bounds: Bounds<f64>) -> Option<Self> {
        (!bounds.is_unbounded()).then_some(Predicate::Rating(bounds))
    }

    /// Discount predicate, `None` unless requested.
    pub fn on_discount(only_discount: bool) -> Option<Self> {
        only_discount.then_some(Predicate::OnDiscount)
    }

    /// Sold predicate, `None` when unbounded.
    pub fn sold(bounds: Bounds<u64>) -> Option<Self> {
        (!bounds.is_unbounded()).then_some(Predicate::Sold(bounds))
    }

    /// Creation-time predicate, `None` when unbounded.
    pub fn created(bounds: Bounds<DateTime<Utc>>) -> Option<Self> {
        (!bounds.is_unbounded()).then_some(Predicate::Created(bounds))
    }

    /// Evaluate against one listing.
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Predicate::Keyword(needle) => {
                fold_case(&listing.title).contains(needle.as_str())
                    || fold_case(&listing.keyword).contains(needle.as_str())
            }
            Predicate::Price(bounds) => bounds.admits(listing.price.as_ref()),
            Predicate::Rating(bounds) => bounds.admits(listing.rating.as_ref()),
            Predicate::OnDiscount => listing.has_discount(),
            Predicate::Sold(bounds) => bounds.admits(listing.sold.as_ref()),
            Predicate::Created(bounds) => bounds.contains(&listing.created_at),
        }
    }
}

/// Case folding used for keyword matching. Stores that index folded text
/// must use the same function.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// The AND of every active predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Build the filter for a set of criteria.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let candidates = [
            criteria.keyword.as_deref().and_then(Predicate::keyword),
            Predicate::price(criteria.price),
            Predicate::rating(criteria.rating),
            Predicate::on_discount(criteria.only_discount),
            Predicate::sold(criteria.sold),
            Predicate::created(criteria.created),
        ];

        Self {
            predicates: candidates.into_iter().flatten().collect(),
        }
    }

    /// The active predicates.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// True when no predicate is active.
    pub fn is_identity(&self) -> bool {
        self.predicates.is_empty()
    }

    /// True when a price range is active.
    pub fn constrains_price(&self) -> bool {
        self.predicates
            .iter()
            .any(|predicate| matches!(predicate, Predicate::Price(_)))
    }

    /// Evaluate against one listing.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.predicates
            .iter()
            .fold(true, |acc, predicate| acc && predicate.matches(listing))
    }

    /// Keep the matching listings, preserving order.
    pub fn select<'a, I>(&self, listings: I) -> Vec<Listing>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect()
    }
}
