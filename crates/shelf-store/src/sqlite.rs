//! SQLite-backed record store.

use crate::backend::{ingest_time, RecordStore};
use crate::db::execute_on;
use crate::{params, Db, Row, StoreError, Value, WhereClause};
use async_trait::async_trait;
use shelf_core::prelude::*;
use shelf_core::search::fold_case;
use std::path::Path;
use std::time::Instant;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    title_folded TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    image TEXT,
    price TEXT,
    discount_price TEXT,
    rating REAL,
    rating_count INTEGER,
    sold INTEGER,
    description TEXT,
    keyword TEXT NOT NULL,
    keyword_folded TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_listings_keyword ON listings(keyword_folded);
CREATE INDEX IF NOT EXISTS idx_listings_created ON listings(created_at);
";

const COLUMNS: &str = "id, title, url, image, price, discount_price, rating, rating_count, \
                       sold, description, keyword, created_at";

const UPSERT: &str = "
INSERT INTO listings (
    title, title_folded, url, image, price, discount_price, rating, rating_count,
    sold, description, keyword, keyword_folded, created_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(url) DO UPDATE SET
    title = excluded.title,
    title_folded = excluded.title_folded,
    image = excluded.image,
    price = excluded.price,
    discount_price = excluded.discount_price,
    rating = excluded.rating,
    rating_count = excluded.rating_count,
    sold = excluded.sold,
    description = excluded.description,
    keyword = excluded.keyword,
    keyword_folded = excluded.keyword_folded
";

/// Listings in a single SQLite table, keyed by url.
///
/// Decimal prices are stored as text and compared numerically; title and
/// keyword are also stored case-folded for keyword search.
pub struct SqliteStore {
    db: Db,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_db(Db::open(path)?)
    }

    /// A throwaway in-memory store.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_db(Db::open_in_memory()?)
    }

    fn with_db(db: Db) -> Result<Self, StoreError> {
        db.execute_batch(SCHEMA)?;
        Ok(Self { db })
    }

    fn select(&self, clause: &WhereClause, tail: &str, extra: &[Value]) -> Result<Vec<Listing>, StoreError> {
        let sql = format!("SELECT {} FROM listings{} {}", COLUMNS, clause.to_sql(), tail);
        let params: Vec<Value> = clause.params().iter().chain(extra).cloned().collect();

        self.db
            .query(&sql, &params)?
            .iter()
            .map(listing_from_row)
            .collect()
    }

    // The SQL clause over-selects on price; re-check every decoded row.
    fn select_exact(&self, filter: &Filter, clause: &WhereClause, tail: &str) -> Result<Vec<Listing>, StoreError> {
        let mut listings = self.select(clause, tail, &[])?;
        listings.retain(|listing| filter.matches(listing));
        Ok(listings)
    }
}

fn listing_from_row(row: &Row) -> Result<Listing, StoreError> {
    Ok(Listing {
        id: ListingId::from(row.integer("id")?),
        title: row.text("title")?,
        url: row.text("url")?,
        image: row.opt_text("image"),
        price: row.opt_decimal("price")?,
        discount_price: row.opt_decimal("discount_price")?,
        rating: row.opt_real("rating"),
        rating_count: row.opt_integer("rating_count").and_then(|v| u32::try_from(v).ok()),
        sold: row.opt_integer("sold").and_then(|v| u64::try_from(v).ok()),
        description: row.opt_text("description"),
        keyword: row.text("keyword")?,
        created_at: row.timestamp("created_at")?,
    })
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<Listing>, StoreError> {
        let filter = Filter::from_criteria(criteria);
        let clause = WhereClause::from_filter(&filter);
        self.select_exact(&filter, &clause, "ORDER BY id ASC")
    }

    async fn search_page(&self, query: &SearchQuery) -> Result<Page<Listing>, StoreError> {
        let filter = Filter::from_criteria(&query.criteria);
        let clause = WhereClause::from_filter(&filter);

        // REAL comparisons cannot rank or bound decimal prices exactly, so
        // the page is cut in memory once price decides membership or order.
        if filter.constrains_price() || query.sort.is_by_price() {
            let tail = format!("ORDER BY {}, id ASC", query.sort.to_sql());
            let matching = self.select_exact(&filter, &clause, &tail)?;
            return Ok(query.paginate(matching));
        }

        let count_sql = format!("SELECT COUNT(*) FROM listings{}", clause.to_sql());
        let total = self.db.query_scalar(&count_sql, clause.params())?;

        let tail = format!("ORDER BY {}, id ASC LIMIT ? OFFSET ?", query.sort.to_sql());
        let items = self.select(&clause, &tail, params![query.per_page, query.offset()])?;

        Ok(Page::new(items, Pagination::new(query.page, query.per_page, total)))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Listing>, StoreError> {
        if url.trim().is_empty() {
            return Ok(None);
        }
        let sql = format!("SELECT {} FROM listings WHERE url = ?", COLUMNS);
        self.db
            .query_optional(&sql, params![url])?
            .as_ref()
            .map(listing_from_row)
            .transpose()
    }

    async fn upsert(&self, keyword: &str, items: &[ListingInput]) -> Result<IngestReport, StoreError> {
        let started = Instant::now();
        let created_at = ingest_time();
        let keyword_folded = fold_case(keyword);

        let report = self.db.transaction(|tx| {
            let mut report = IngestReport {
                received: items.len() as u64,
                ..IngestReport::default()
            };

            for item in items {
                let Some(url) = item.valid_url() else {
                    report.skipped += 1;
                    continue;
                };
                let title = item.title.clone().unwrap_or_default();

                execute_on(
                    tx,
                    UPSERT,
                    params![
                        title.as_str(),
                        fold_case(&title),
                        url,
                        item.image.clone(),
                        item.price,
                        item.discount_price,
                        item.rating,
                        item.rating_count,
                        item.sold,
                        item.description.clone(),
                        keyword,
                        keyword_folded.as_str(),
                        created_at
                    ],
                )?;
                report.saved += 1;
            }
            Ok(report)
        })?;

        tracing::info!(
            backend = self.backend_name(),
            saved = report.saved,
            skipped = report.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upserted listings"
        );
        Ok(report)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let total = self.db.query_scalar("SELECT COUNT(*) FROM listings", params![])?;
        Ok(total.max(0) as u64)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(url: &str, title: &str, price: Option<i64>) -> ListingInput {
        ListingInput {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            price: price.map(Decimal::from),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_and_find() {
        let store = SqliteStore::in_memory().unwrap();
        let report = store
            .upsert(
                "phone",
                &[
                    item("https://x/1", "Phone One", Some(100)),
                    ListingInput::default(),
                    item("  ", "Blank", None),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report, IngestReport { received: 3, saved: 1, skipped: 2 });
        assert_eq!(store.count().await.unwrap(), 1);

        let found = store.find_by_url("https://x/1").await.unwrap().unwrap();
        assert_eq!(found.title, "Phone One");
        assert_eq!(found.price, Some(Decimal::from(100)));
        assert_eq!(found.keyword, "phone");
        assert!(store.find_by_url(" ").await.unwrap().is_none());
        assert!(store.find_by_url("https://x/none").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert("old", &[item("https://x/1", "Old", Some(5))]).await.unwrap();
        let before = store.find_by_url("https://x/1").await.unwrap().unwrap();

        store.upsert("new", &[item("https://x/1", "New", Some(7))]).await.unwrap();
        let after = store.find_by_url("https://x/1").await.unwrap().unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.title, "New");
        assert_eq!(after.keyword, "new");
        assert_eq!(after.price, Some(Decimal::from(7)));
    }

    #[tokio::test]
    async fn test_decimal_text_survives_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let mut input = item("https://x/1", "A", None);
        input.price = Some(Decimal::new(1234567890123456789, 10));
        store.upsert("k", &[input]).await.unwrap();

        let found = store.find_by_url("https://x/1").await.unwrap().unwrap();
        assert_eq!(found.price, Some(Decimal::new(1234567890123456789, 10)));
    }

    #[tokio::test]
    async fn test_price_filter_is_exact_beyond_real_precision() {
        let store = SqliteStore::in_memory().unwrap();
        let mut above = item("https://x/above", "Above", None);
        above.price = Some(Decimal::from_str_exact("10.0000000000000000001").unwrap());
        let mut below = item("https://x/below", "Below", None);
        below.price = Some(Decimal::from_str_exact("9.9999999999999999999").unwrap());
        store
            .upsert("k", &[above, below, item("https://x/ten", "Ten", Some(10))])
            .await
            .unwrap();

        let at_most_ten = FilterCriteria::new().with_price(None, Some(Decimal::from(10)));
        let found = store.search(&at_most_ten).await.unwrap();
        let urls: Vec<&str> = found.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/below", "https://x/ten"]);

        let at_least_ten = FilterCriteria::new().with_price(Some(Decimal::from(10)), None);
        let page = store.search_page(&SearchQuery::new(at_least_ten)).await.unwrap();
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_price_sort_orders_exact_decimals() {
        let store = SqliteStore::in_memory().unwrap();
        let mut larger = item("https://x/larger", "Larger", None);
        larger.price = Some(Decimal::from_str_exact("10.0000000000000000002").unwrap());
        let mut smaller = item("https://x/smaller", "Smaller", None);
        smaller.price = Some(Decimal::from_str_exact("10.0000000000000000001").unwrap());
        store.upsert("k", &[larger, smaller]).await.unwrap();

        let query = SearchQuery::default().with_sort(SortOption::PriceAsc);
        let page = store.search_page(&query).await.unwrap();
        assert_eq!(page.items[0].url, "https://x/smaller");
        assert_eq!(page.items[1].url, "https://x/larger");
    }

    #[tokio::test]
    async fn test_search_page_sorts_missing_last() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .upsert(
                "k",
                &[
                    item("https://x/a", "A", None),
                    item("https://x/b", "B", Some(20)),
                    item("https://x/c", "C", Some(10)),
                ],
            )
            .await
            .unwrap();

        let query = SearchQuery::default()
            .with_sort(SortOption::PriceAsc)
            .with_pagination(1, 2);
        let page = store.search_page(&query).await.unwrap();

        let urls: Vec<&str> = page.items.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/c", "https://x/b"]);
        assert_eq!(page.pagination.total, 3);
        assert!(page.pagination.has_next);

        let page = store.search_page(&query.with_pagination(2, 2)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].url, "https://x/a");
    }
}
