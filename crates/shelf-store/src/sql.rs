//! Rendering the combined filter as a parameterized `WHERE` clause.
//!
//! Each predicate becomes one condition; conditions are joined with `AND`.
//! Every predicate except price renders exactly. Prices are stored as
//! decimal text and SQLite can only compare them as REAL, so a price range
//! renders as a slightly wider REAL range: the clause selects a superset of
//! what the in-memory [`Filter`] selects, and callers re-check the decoded
//! rows with [`Filter::matches`].

use crate::Value;
use chrono::{DateTime, Utc};
use shelf_core::price;
use shelf_core::search::{Bounds, Filter, Predicate};

/// A `WHERE` clause and its positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    /// Render a filter.
    pub fn from_filter(filter: &Filter) -> Self {
        filter
            .predicates()
            .iter()
            .fold(Self::default(), |clause, predicate| clause.and(predicate))
    }

    fn and(mut self, predicate: &Predicate) -> Self {
        match predicate {
            Predicate::Keyword(needle) => {
                self.conditions
                    .push("(instr(title_folded, ?) > 0 OR instr(keyword_folded, ?) > 0)".to_string());
                self.params.push(Value::from(needle.as_str()));
                self.params.push(Value::from(needle.as_str()));
            }
            Predicate::Price(bounds) => {
                let bounds = Bounds::new(
                    bounds.min.map(|min| widen_down(price::to_f64(min))),
                    bounds.max.map(|max| widen_up(price::to_f64(max))),
                );
                self.range("CAST(price AS REAL)", bounds);
            }
            Predicate::Rating(bounds) => self.range("rating", *bounds),
            Predicate::OnDiscount => self.conditions.push("discount_price IS NOT NULL".to_string()),
            Predicate::Sold(bounds) => self.range("sold", *bounds),
            Predicate::Created(bounds) => {
                let bounds = Bounds::new(bounds.min.map(millis_ceil), bounds.max.map(millis_floor));
                self.range("created_at", bounds);
            }
        }
        self
    }

    // A NULL column compares as NULL, which excludes the row whenever a
    // bound is active.
    fn range<T: Into<Value>>(&mut self, column: &str, bounds: Bounds<T>) {
        if let Some(min) = bounds.min {
            self.conditions.push(format!("{} >= ?", column));
            self.params.push(min.into());
        }
        if let Some(max) = bounds.max {
            self.conditions.push(format!("{} <= ?", column));
            self.params.push(max.into());
        }
    }

    /// The clause including the `WHERE` keyword, or an empty string when no
    /// predicate is active.
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// The positional parameters in order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

// Decimal text and the bound go through separate conversions to REAL and
// can land a few ulps apart; the slack covers that with room to spare.
fn real_slack(x: f64) -> f64 {
    x.abs() * 8.0 * f64::EPSILON + f64::MIN_POSITIVE
}

fn widen_down(x: f64) -> f64 {
    x - real_slack(x)
}

fn widen_up(x: f64) -> f64 {
    x + real_slack(x)
}

// `created_at` is stored in whole milliseconds; round bounds inward so a
// sub-millisecond bound admits the same rows as the in-memory comparison.
fn millis_floor(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

fn millis_ceil(ts: DateTime<Utc>) -> i64 {
    let floor = ts.timestamp_millis();
    if ts.timestamp_subsec_nanos() % 1_000_000 == 0 {
        floor
    } else {
        floor + 1
    }
}
