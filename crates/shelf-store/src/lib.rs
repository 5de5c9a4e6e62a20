//! Record stores and the listing service for shelf.
//!
//! Two interchangeable backends implement [`RecordStore`]:
//!
//! - **sqlite**: a single `listings` table, filtering rendered to SQL
//! - **document**: a JSON-lines file held in memory, filtered in Rust
//!
//! [`ListingService`] runs statistics, search and ingestion on top of
//! whichever backend the configuration selects.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_store::{open_store, ListingService, StoreConfig};
//! use shelf_core::prelude::*;
//!
//! let store = open_store(&StoreConfig::default()).await?;
//! let service = ListingService::new(store);
//!
//! let criteria = FilterCriteria::new().with_keyword("phone");
//! let summary = service.stats(&criteria, StatsConfig::default()).await?;
//! ```

mod backend;
mod db;
mod document;
mod error;
mod service;
mod sql;
mod sqlite;
mod types;

pub use backend::{open_store, RecordStore, StoreConfig, StoreKind};
pub use db::Db;
pub use document::DocumentStore;
pub use error::StoreError;
pub use service::{ListingService, ServiceError};
pub use sql::WhereClause;
pub use sqlite::SqliteStore;
pub use types::{Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        open_store, params, DocumentStore, ListingService, RecordStore, ServiceError, SqliteStore,
        StoreConfig, StoreError, StoreKind,
    };
}

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use shelf_store::params;
///
/// let params = params!["phone", 42, 3.14];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
