//! Search module.
//!
//! Contains filter criteria, the combined predicate, sorting and pagination.

mod criteria;
mod filter;
mod query;
mod results;

pub use criteria::{parse_timestamp, Bounds, FilterCriteria};
pub use filter::{fold_case, Filter, Predicate};
pub use query::{SearchQuery, SortOption, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use results::{Page, Pagination};
