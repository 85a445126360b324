//! Driver that accepts every operation and returns nothing.

use log::debug;

use crate::document::{Attributes, DocumentBatch, DocumentId};
use crate::driver::{Driver, PageWindow};
use crate::error::Result;
use crate::query::{QueryClause, QueryFactory};
use crate::result::{PagedResultCollection, ResultCollection};

/// No-op driver.
///
/// Searches return empty collections with zeroed statistics and writes
/// succeed without contacting any backend. Useful for tests and for
/// disabling search in an environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDriver;

impl NullDriver {
    /// Create a new null driver.
    pub fn new() -> Self {
        NullDriver
    }
}

impl QueryFactory for NullDriver {}

impl Driver for NullDriver {
    fn name(&self) -> &str {
        "null"
    }

    fn as_query_factory(&self) -> &dyn QueryFactory {
        self
    }

    fn get(&self, _types: &[&str], clauses: &[QueryClause]) -> Result<ResultCollection> {
        debug!("null driver: ignoring search with {} clauses", clauses.len());
        Ok(ResultCollection::empty())
    }

    fn paginate(
        &self,
        _types: &[&str],
        _clauses: &[QueryClause],
        page: usize,
        per_page: usize,
        offset: Option<usize>,
    ) -> Result<PagedResultCollection> {
        let window = PageWindow::new(page, per_page, offset);
        Ok(PagedResultCollection::new(
            Vec::new(),
            0,
            window.per_page,
            window.page,
        ))
    }

    fn add(&self, _category: &str, _id: &DocumentId, _data: Attributes) -> Result<&dyn Driver> {
        Ok(self)
    }

    fn add_multiple(&self, _category: &str, _documents: DocumentBatch) -> Result<&dyn Driver> {
        Ok(self)
    }

    fn delete(&self, _category: &str, _id: &DocumentId) -> Result<&dyn Driver> {
        Ok(self)
    }
}
