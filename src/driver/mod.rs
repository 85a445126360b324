//! Backend driver contract.
//!
//! A [`Driver`] turns a clause sequence into a backend request, executes it
//! and decorates the hits. Every driver is also a [`QueryFactory`]: a
//! [`QueryBuilder`] obtained through [`Driver::query_builder`] builds its
//! query records through the driver.
//!
//! Bundled drivers:
//!
//! - [`NullDriver`]: accepts everything, returns nothing
//! - [`MemoryDriver`]: in-process backend evaluating every query kind
//! - [`ElasticDriver`]: Elasticsearch DSL over an injected [`SearchClient`]

pub mod elastic;
pub mod memory;
pub mod null;

use std::fmt;

use crate::document::{Attributes, DocumentBatch, DocumentId};
use crate::error::Result;
use crate::query::{QueryBuilder, QueryClause, QueryFactory};
use crate::result::{PagedResultCollection, ResultCollection};

pub use self::elastic::{ElasticDriver, SearchClient};
pub use self::memory::MemoryDriver;
pub use self::null::NullDriver;

/// Backend contract shared by every driver.
///
/// An empty `types` slice searches every category. Write operations return
/// the driver itself so calls can be chained.
pub trait Driver: QueryFactory + fmt::Debug {
    /// Registry name of the driver ("memory", "elastic", "null", ...).
    fn name(&self) -> &str;

    /// The driver as a plain query factory.
    fn as_query_factory(&self) -> &dyn QueryFactory;

    /// Execute `clauses` and return every matching hit.
    ///
    /// MUST clauses are required, MUST_NOT clauses exclude, and SHOULD
    /// clauses are only required when there is no MUST clause.
    fn get(&self, types: &[&str], clauses: &[QueryClause]) -> Result<ResultCollection>;

    /// Execute `clauses` and return one page of hits.
    ///
    /// The window starts at `offset`, or at `(page - 1) * per_page` when no
    /// offset is given. Statistics reflect every matching hit.
    fn paginate(
        &self,
        types: &[&str],
        clauses: &[QueryClause],
        page: usize,
        per_page: usize,
        offset: Option<usize>,
    ) -> Result<PagedResultCollection>;

    /// Index (or replace) one document and make it searchable.
    fn add(&self, category: &str, id: &DocumentId, data: Attributes) -> Result<&dyn Driver>;

    /// Index a batch of documents; they become searchable together, after
    /// the whole batch.
    fn add_multiple(&self, category: &str, documents: DocumentBatch) -> Result<&dyn Driver>;

    /// Remove one document. Fails with `NotFound` when it does not exist.
    fn delete(&self, category: &str, id: &DocumentId) -> Result<&dyn Driver>;

    /// A query builder constructing its queries through this driver.
    fn query_builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(self.as_query_factory())
    }
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page number, at least 1.
    pub page: usize,
    /// Page size, at least 1.
    pub per_page: usize,
    /// Offset of the first hit of the page.
    pub from: usize,
}

impl PageWindow {
    /// Normalize page and size to at least 1 and resolve the offset.
    pub fn new(page: usize, per_page: usize, offset: Option<usize>) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let from = offset.unwrap_or((page - 1).saturating_mul(per_page));
        PageWindow {
            page,
            per_page,
            from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_default_offset() {
        let window = PageWindow::new(3, 10, None);
        assert_eq!(window.from, 20);
        assert_eq!(window.page, 3);
    }

    #[test]
    fn test_page_window_explicit_offset() {
        let window = PageWindow::new(2, 10, Some(5));
        assert_eq!(window.from, 5);
    }

    #[test]
    fn test_page_window_normalizes_zero() {
        let window = PageWindow::new(0, 0, None);
        assert_eq!(
            window,
            PageWindow {
                page: 1,
                per_page: 1,
                from: 0
            }
        );
    }
}
