//! CLI command implementations.

pub mod config;
pub mod ingest;
pub mod search;
pub mod show;
pub mod stats;

use clap::{Args, Subcommand};
use shelf_core::price;
use shelf_core::search::{parse_timestamp, FilterCriteria};

/// Filter flags shared by `stats` and `search`.
///
/// Values are taken as text and parsed leniently: anything malformed is
/// logged and treated as if the flag was not given.
#[derive(Args, Debug, Default, Clone)]
pub struct CriteriaArgs {
    /// Case-insensitive text matched against title or keyword.
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Minimum price (inclusive).
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price (inclusive).
    #[arg(long)]
    pub max_price: Option<String>,

    /// Minimum rating (inclusive).
    #[arg(long)]
    pub min_rating: Option<String>,

    /// Maximum rating (inclusive).
    #[arg(long)]
    pub max_rating: Option<String>,

    /// Only listings with a discount price.
    #[arg(long)]
    pub only_discount: bool,

    /// Minimum units sold (inclusive).
    #[arg(long)]
    pub min_sold: Option<String>,

    /// Maximum units sold (inclusive).
    #[arg(long)]
    pub max_sold: Option<String>,

    /// Created at or after (RFC 3339 or YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Created at or before (RFC 3339 or YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,
}

impl CriteriaArgs {
    /// Build filter criteria, dropping malformed values.
    pub fn to_criteria(&self) -> FilterCriteria {
        let keyword = self.keyword.clone().filter(|k| !k.trim().is_empty());

        FilterCriteria {
            keyword,
            ..FilterCriteria::new()
        }
        .with_price(
            lenient("min-price", self.min_price.as_deref(), price::parse),
            lenient("max-price", self.max_price.as_deref(), price::parse),
        )
        .with_rating(
            lenient("min-rating", self.min_rating.as_deref(), parse_rating),
            lenient("max-rating", self.max_rating.as_deref(), parse_rating),
        )
        .with_only_discount(self.only_discount)
        .with_sold(
            lenient("min-sold", self.min_sold.as_deref(), parse_count),
            lenient("max-sold", self.max_sold.as_deref(), parse_count),
        )
        .with_created(
            lenient("from", self.from.as_deref(), parse_timestamp),
            lenient("to", self.to.as_deref(), parse_timestamp),
        )
    }
}

/// Parse an optional flag value, logging and discarding it when malformed.
fn lenient<T>(flag: &str, raw: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = raw?;
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::warn!(flag, value = raw, "ignoring malformed value");
    }
    parsed
}

fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_count(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// Histogram bucket count (default from config).
    #[arg(long, allow_negative_numbers = true)]
    pub bins: Option<i64>,

    /// Ranking length (default from config).
    #[arg(long, allow_negative_numbers = true)]
    pub top_n: Option<i64>,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// Sort order: newest, oldest, price-asc, price-desc, best-selling, rating.
    #[arg(short, long, default_value = "newest")]
    pub sort: String,

    /// Page number (1-indexed).
    #[arg(short, long, default_value = "1")]
    pub page: i64,

    /// Listings per page (default from config).
    #[arg(long)]
    pub per_page: Option<i64>,
}

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Listing url.
    pub url: String,
}

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// Path to a JSON batch: {"keyword": ..., "count": ..., "items": [...]}.
    pub file: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// File to create (a .json path writes JSON).
        #[arg(long, default_value = "shelf.toml")]
        path: String,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_well_formed_flags() {
        let args = CriteriaArgs {
            keyword: Some("phone".to_string()),
            min_price: Some("10".to_string()),
            max_price: Some("99.90".to_string()),
            min_rating: Some("4".to_string()),
            only_discount: true,
            max_sold: Some("0".to_string()),
            from: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        let criteria = args.to_criteria();

        assert_eq!(criteria.keyword.as_deref(), Some("phone"));
        assert_eq!(criteria.price.min, Some(Decimal::from(10)));
        assert_eq!(criteria.price.max, Some(Decimal::new(9990, 2)));
        assert_eq!(criteria.rating.min, Some(4.0));
        assert!(criteria.only_discount);
        assert_eq!(criteria.sold.max, Some(0));
        assert!(criteria.created.min.is_some());
        assert!(criteria.created.max.is_none());
    }

    #[test]
    fn test_malformed_flags_become_absent() {
        let args = CriteriaArgs {
            keyword: Some("  ".to_string()),
            min_price: Some("cheap".to_string()),
            min_rating: Some("NaN".to_string()),
            min_sold: Some("-3".to_string()),
            to: Some("last week".to_string()),
            ..Default::default()
        };

        assert_eq!(args.to_criteria(), FilterCriteria::new());
    }
}
