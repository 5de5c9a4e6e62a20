//! Listing snapshots and ingest payloads.

use crate::error::ListingError;
use crate::ids::ListingId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product listing snapshot.
///
/// `url` is the business key: stores keep at most one listing per url and
/// update it in place when the same url is ingested again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Opaque identifier assigned by the store.
    pub id: ListingId,
    /// Listing title.
    pub title: String,
    /// Listing url (unique).
    pub url: String,
    /// Image url.
    #[serde(default)]
    pub image: Option<String>,
    /// Regular price.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Discounted price. Presence means the listing is on discount.
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    /// Average rating, conventionally 0-5.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of ratings.
    #[serde(default)]
    pub rating_count: Option<u32>,
    /// Units sold.
    #[serde(default)]
    pub sold: Option<u64>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Query that produced this listing.
    pub keyword: String,
    /// When the listing was first ingested.
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Create a listing with only the required fields set.
    pub fn new(title: impl Into<String>, url: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            id: ListingId::generate(),
            title: title.into(),
            url: url.into(),
            image: None,
            price: None,
            discount_price: None,
            rating: None,
            rating_count: None,
            sold: None,
            description: None,
            keyword: keyword.into(),
            created_at: Utc::now(),
        }
    }

    /// Check if the listing is on discount.
    pub fn has_discount(&self) -> bool {
        self.discount_price.is_some()
    }

    /// Check if the listing has a usable positive price.
    pub fn has_positive_price(&self) -> bool {
        self.price.is_some_and(|p| p > Decimal::ZERO)
    }

    /// Overwrite the scraped fields from an ingest item.
    ///
    /// `id`, `url` and `created_at` are left untouched.
    pub fn apply(&mut self, input: &ListingInput, keyword: &str) {
        self.title = input.title.clone().unwrap_or_default();
        self.image = input.image.clone();
        self.price = input.price;
        self.discount_price = input.discount_price;
        self.rating = input.rating;
        self.rating_count = input.rating_count;
        self.sold = input.sold;
        self.description = input.description.clone();
        self.keyword = keyword.to_string();
    }

    /// Build a fresh listing from an ingest item.
    pub fn from_input(input: &ListingInput, keyword: &str, created_at: DateTime<Utc>) -> Result<Self, ListingError> {
        let url = input.valid_url().ok_or(ListingError::MissingUrl)?;
        let mut listing = Listing::new("", url, keyword);
        listing.created_at = created_at;
        listing.apply(input, keyword);
        Ok(listing)
    }

    // Builder-style setters, mostly used by tests and fixtures.

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_discount_price(mut self, price: Decimal) -> Self {
        self.discount_price = Some(price);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_sold(mut self, sold: u64) -> Self {
        self.sold = Some(sold);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// One scraped item as it arrives for ingestion.
///
/// Everything is optional on the wire; items without a url are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub sold: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ListingInput {
    /// The url, if present and not blank.
    pub fn valid_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// A batch of scraped items produced by one source query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestBatch {
    /// Source query; becomes the `keyword` of every stored listing.
    pub keyword: String,
    /// Item count reported by the producer.
    #[serde(default)]
    pub count: Option<u64>,
    /// The scraped items.
    #[serde(default)]
    pub items: Vec<ListingInput>,
}

impl IngestBatch {
    /// Parse a batch from JSON.
    pub fn from_json(json: &str) -> Result<Self, ListingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject batches that cannot be attributed to a source query.
    pub fn validate(&self) -> Result<(), ListingError> {
        if self.keyword.trim().is_empty() {
            return Err(ListingError::MissingKeyword);
        }
        Ok(())
    }

    /// Number of items received, as reported by the producer when present.
    pub fn received(&self) -> u64 {
        self.count.unwrap_or(self.items.len() as u64)
    }
}

/// Outcome of an ingest.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Items received.
    pub received: u64,
    /// Items inserted or updated.
    pub saved: u64,
    /// Items skipped for lack of a url.
    pub skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(url: Option<&str>) -> ListingInput {
        ListingInput {
            title: Some("Phone X".to_string()),
            url: url.map(String::from),
            price: Some(Decimal::from(100)),
            sold: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_input_requires_url() {
        let now = Utc::now();
        assert!(Listing::from_input(&input(None), "phone", now).is_err());
        assert!(Listing::from_input(&input(Some("  ")), "phone", now).is_err());

        let listing = Listing::from_input(&input(Some("https://x/1")), "phone", now).unwrap();
        assert_eq!(listing.url, "https://x/1");
        assert_eq!(listing.title, "Phone X");
        assert_eq!(listing.keyword, "phone");
        assert_eq!(listing.created_at, now);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut listing = Listing::new("Old", "https://x/1", "old");
        let id = listing.id.clone();
        let created = listing.created_at;

        listing.apply(&input(Some("https://x/other")), "new");

        assert_eq!(listing.id, id);
        assert_eq!(listing.created_at, created);
        assert_eq!(listing.url, "https://x/1");
        assert_eq!(listing.keyword, "new");
        assert_eq!(listing.sold, Some(3));
    }

    #[test]
    fn test_discount_and_price_flags() {
        let listing = Listing::new("A", "u", "k");
        assert!(!listing.has_discount());
        assert!(!listing.has_positive_price());

        let listing = listing.with_price(Decimal::ZERO).with_discount_price(Decimal::ONE);
        assert!(listing.has_discount());
        assert!(!listing.has_positive_price());
    }

    #[test]
    fn test_batch_parsing() {
        let json = r#"{
            "keyword": "telefono",
            "count": 2,
            "items": [
                {"title": "A", "url": "https://x/a", "price": 10.5, "discountPrice": 9.99, "ratingCount": 7},
                {"title": "B"}
            ]
        }"#;
        let batch = IngestBatch::from_json(json).unwrap();
        assert_eq!(batch.keyword, "telefono");
        assert_eq!(batch.received(), 2);
        assert_eq!(batch.items[0].price, Some(Decimal::new(105, 1)));
        assert_eq!(batch.items[0].discount_price, Some(Decimal::new(999, 2)));
        assert_eq!(batch.items[0].rating_count, Some(7));
        assert_eq!(batch.items[1].valid_url(), None);
    }

    #[test]
    fn test_batch_requires_keyword() {
        let batch = IngestBatch {
            keyword: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(batch.validate(), Err(ListingError::MissingKeyword)));
    }
}
