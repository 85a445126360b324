//! Decorated search results.
//!
//! Drivers wrap every backend hit in a [`SearchResult`] and hand back a
//! [`ResultCollection`] or a [`PagedResultCollection`], both carrying the
//! [`QueryStats`] of the execution.

pub mod collection;
pub mod hit;
pub mod value;

pub use self::collection::{PagedResultCollection, QueryStatistics, QueryStats, ResultCollection};
pub use self::hit::SearchResult;
pub use self::value::ResultValue;
