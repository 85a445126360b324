//! # Searchlight
//!
//! Index application models into a full-text search engine and query them
//! through a fluent, backend-agnostic builder.
//!
//! ## Features
//!
//! - Fluent [`QueryBuilder`](query::QueryBuilder) with MUST / SHOULD / MUST_NOT roles
//! - Match, multi-match, fuzzy, common-terms, range, prefix, regexp, term,
//!   terms, wildcard, query-string and match-all queries
//! - Swappable [`Driver`](driver::Driver)s: Elasticsearch, in-memory and null
//! - Recursively addressable results with query statistics and pagination
//! - Indexing glue for models: registry, reindex and change events
//!
//! ## Example
//!
//! ```
//! use searchlight::prelude::*;
//! use serde_json::json;
//!
//! let driver = MemoryDriver::new();
//! driver
//!     .add("books", &DocumentId::from(1), attributes(json!({"title": "Testing Rust"})))
//!     .unwrap();
//!
//! let mut builder = driver.query_builder();
//! builder
//!     .match_query("title", "test", MatchOptions { fuzzy: true, ..Default::default() })
//!     .must();
//!
//! let results = driver.get(&["books"], builder.clauses()).unwrap();
//! assert_eq!(results.total_hits(), 1);
//! assert_eq!(results[0].get("title").as_text(), Some("Testing Rust"));
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod driver;
pub mod error;
pub mod manager;
pub mod observer;
pub mod query;
pub mod result;
pub mod searchable;
pub mod util;

pub mod prelude {
    pub use crate::document::{Attributes, DocumentBatch, DocumentId, attributes};
    pub use crate::driver::{Driver, ElasticDriver, MemoryDriver, NullDriver, SearchClient};
    pub use crate::error::{Result, SearchlightError};
    pub use crate::manager::SearchManager;
    pub use crate::query::{
        Bounds, CommonOptions, Fuzziness, FuzzyOptions, MatchOptions, MatchType,
        MultiMatchOptions, MultiMatchType, Occur, Operator, QueryBuilder, QueryClause, QueryKind,
        RangeOptions, WildcardOptions,
    };
    pub use crate::result::{
        PagedResultCollection, QueryStatistics, ResultCollection, ResultValue, SearchResult,
    };
    pub use crate::searchable::Searchable;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
