//! Filter criteria.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An inclusive range with independently optional ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    /// Lower bound (inclusive).
    pub min: Option<T>,
    /// Upper bound (inclusive).
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<T: PartialOrd> Bounds<T> {
    /// Create a range.
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    /// True when neither end is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Check a value against both ends.
    pub fn contains(&self, value: &T) -> bool {
        let above_min = self.min.as_ref().map_or(true, |min| value >= min);
        let below_max = self.max.as_ref().map_or(true, |max| value <= max);
        above_min && below_max
    }

    /// Check an optional field. A missing value fails any active bound.
    pub fn admits(&self, value: Option<&T>) -> bool {
        match value {
            Some(v) => self.contains(v),
            None => self.is_unbounded(),
        }
    }
}

/// Optional constraints narrowing which listings take part in a search.
///
/// Every field is independently optional. Absent fields contribute nothing
/// to the combined predicate built by [`Filter`](super::Filter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against title or keyword.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Price range.
    #[serde(default)]
    pub price: Bounds<Decimal>,
    /// Rating range.
    #[serde(default)]
    pub rating: Bounds<f64>,
    /// Only listings with a discount price.
    #[serde(default)]
    pub only_discount: bool,
    /// Units-sold range.
    #[serde(default)]
    pub sold: Bounds<u64>,
    /// Creation time range.
    #[serde(default)]
    pub created: Bounds<DateTime<Utc>>,
}

impl FilterCriteria {
    /// Criteria with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_price(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.price = Bounds::new(min, max);
        self
    }

    pub fn with_rating(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rating = Bounds::new(min, max);
        self
    }

    pub fn with_only_discount(mut self, only_discount: bool) -> Self {
        self.only_discount = only_discount;
        self
    }

    pub fn with_sold(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.sold = Bounds::new(min, max);
        self
    }

    pub fn with_created(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.created = Bounds::new(from, to);
        self
    }

    /// The keyword if it is present and not blank.
    pub fn active_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Parse a timestamp bound.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`) or a bare date (`2024-05-01`,
/// read as midnight UTC). Anything else is `None`, which callers treat as
/// "no bound".
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
