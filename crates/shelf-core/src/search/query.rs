//! Paged search query.

use crate::catalog::Listing;
use crate::search::{FilterCriteria, Page, Pagination};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default page size for listing searches.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Maximum page size for listing searches.
pub const MAX_PER_PAGE: i64 = 100;

/// Sort options for paged search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    /// Sort by newest first.
    #[default]
    Newest,
    /// Sort by oldest first.
    Oldest,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by units sold.
    BestSelling,
    /// Sort by highest rated.
    Rating,
}

impl SortOption {
    /// Get SQL ORDER BY clause.
    ///
    /// Rows missing the sort field come last. Stores append their own
    /// insertion-order tie breaker.
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOption::Newest => "created_at DESC",
            SortOption::Oldest => "created_at ASC",
            SortOption::PriceAsc => "price IS NULL, CAST(price AS REAL) ASC",
            SortOption::PriceDesc => "price IS NULL, CAST(price AS REAL) DESC",
            SortOption::BestSelling => "sold IS NULL, sold DESC",
            SortOption::Rating => "rating IS NULL, rating DESC",
        }
    }

    /// True for the orders keyed on price.
    pub fn is_by_price(&self) -> bool {
        matches!(self, SortOption::PriceAsc | SortOption::PriceDesc)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::Oldest => "Oldest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::BestSelling => "Best Selling",
            SortOption::Rating => "Highest Rated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "newest" => Some(SortOption::Newest),
            "oldest" => Some(SortOption::Oldest),
            "priceasc" => Some(SortOption::PriceAsc),
            "pricedesc" => Some(SortOption::PriceDesc),
            "bestselling" | "sold" => Some(SortOption::BestSelling),
            "rating" => Some(SortOption::Rating),
            _ => None,
        }
    }

    /// Compare two listings in this order, for stores that sort in memory.
    ///
    /// Agrees with [`to_sql`](Self::to_sql): missing values sort last, equal
    /// keys compare `Equal` so a stable sort keeps insertion order.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            SortOption::Newest => b.created_at.cmp(&a.created_at),
            SortOption::Oldest => a.created_at.cmp(&b.created_at),
            SortOption::PriceAsc => missing_last(a.price, b.price, |x, y| x.cmp(&y)),
            SortOption::PriceDesc => missing_last(a.price, b.price, |x, y| y.cmp(&x)),
            SortOption::BestSelling => missing_last(a.sold, b.sold, |x, y| y.cmp(&x)),
            SortOption::Rating => missing_last(a.rating, b.rating, |x, y| y.total_cmp(&x)),
        }
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, present: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => present(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A paged search over listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Filter criteria.
    pub criteria: FilterCriteria,
    /// Sort option.
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
}

impl SearchQuery {
    /// Create a new search query.
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            sort: SortOption::Newest,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Calculate offset for SQL LIMIT/OFFSET.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Sort the complete matching set in this query's order and cut out the
    /// requested page. The sort is stable, so ties keep the incoming order.
    pub fn paginate(&self, mut matching: Vec<Listing>) -> Page<Listing> {
        matching.sort_by(|a, b| self.sort.compare(a, b));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(self.offset().max(0) as usize)
            .take(self.per_page.max(0) as usize)
            .collect();

        Page::new(items, Pagination::new(self.page, self.per_page, total))
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new(FilterCriteria::new().with_keyword("rust"))
            .with_sort(SortOption::PriceAsc)
            .with_pagination(2, 10);

        assert_eq!(query.page, 2);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.offset(), 10);
        assert_eq!(query.sort, SortOption::PriceAsc);
    }

    #[test]
    fn test_pagination_is_clamped() {
        let query = SearchQuery::default().with_pagination(0, 1000);
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_sort_from_str() {
        assert_eq!(SortOption::from_str("price-desc"), Some(SortOption::PriceDesc));
        assert_eq!(SortOption::from_str("best_selling"), Some(SortOption::BestSelling));
        assert_eq!(SortOption::from_str("sold"), Some(SortOption::BestSelling));
        assert_eq!(SortOption::from_str("cheapest"), None);
    }

    #[test]
    fn test_compare_puts_missing_last() {
        let priced = Listing::new("a", "u1", "k").with_price(Decimal::from(5));
        let unpriced = Listing::new("b", "u2", "k");

        let mut items = vec![unpriced.clone(), priced.clone()];
        items.sort_by(|a, b| SortOption::PriceDesc.compare(a, b));
        assert_eq!(items[0].url, "u1");

        items.sort_by(|a, b| SortOption::PriceAsc.compare(a, b));
        assert_eq!(items[0].url, "u1");
    }

    #[test]
    fn test_paginate_sorts_exact_decimals() {
        let tiny = Decimal::from_str_exact("10.0000000000000000001").unwrap();
        let tinier = Decimal::from_str_exact("10.00000000000000000005").unwrap();
        let matching = vec![
            Listing::new("a", "u1", "k").with_price(tiny),
            Listing::new("b", "u2", "k"),
            Listing::new("c", "u3", "k").with_price(tinier),
            Listing::new("d", "u4", "k").with_price(Decimal::from(10)),
        ];

        let query = SearchQuery::default()
            .with_sort(SortOption::PriceDesc)
            .with_pagination(1, 3);
        let page = query.paginate(matching.clone());
        let urls: Vec<&str> = page.items.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["u1", "u3", "u4"]);
        assert_eq!(page.pagination.total, 4);
        assert!(page.pagination.has_next);

        let page = query.with_pagination(2, 3).paginate(matching);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].url, "u2");
    }

    #[test]
    fn test_compare_best_selling() {
        let a = Listing::new("a", "u1", "k").with_sold(1);
        let b = Listing::new("b", "u2", "k").with_sold(9);
        assert_eq!(SortOption::BestSelling.compare(&a, &b), Ordering::Greater);
    }
}
