//! Elasticsearch driver.
//!
//! Clauses are flattened into a `bool` query (see
//! [`SearchRequest::to_json`]) and executed through an injected
//! [`SearchClient`]. Every write is followed by an index refresh so it is
//! immediately searchable; a batch is refreshed once.

pub mod client;
mod response;

use std::sync::Arc;

use log::{debug, info};
use serde_json::{Value, json};

use crate::document::{Attributes, DocumentBatch, DocumentId};
use crate::driver::{Driver, PageWindow};
use crate::error::{Result, SearchlightError};
use crate::query::{QueryClause, QueryFactory, SearchRequest};
use crate::result::{PagedResultCollection, QueryStatistics, ResultCollection};

pub use self::client::{ClientConnector, ElasticConfig, SearchClient};
use self::response::{SearchResponse, bulk_error, is_not_found};

/// Driver for an Elasticsearch backend.
#[derive(Debug, Clone)]
pub struct ElasticDriver {
    client: Arc<dyn SearchClient>,
    index: String,
}

impl ElasticDriver {
    /// Driver writing to and searching `index` through `client`.
    pub fn new<S: Into<String>>(client: Arc<dyn SearchClient>, index: S) -> Self {
        ElasticDriver {
            client,
            index: index.into(),
        }
    }

    /// Build the client from `config` with `connect` and wrap it.
    pub fn connect(config: &ElasticConfig, connect: &ClientConnector) -> Result<Self> {
        let client = connect(config)?;
        debug!(
            "elastic driver: connected to {} (index '{}')",
            config.base_url(),
            config.index
        );
        Ok(Self::new(client, config.index.clone()))
    }

    /// Name of the backing index.
    pub fn index(&self) -> &str {
        &self.index
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let body = request.to_json();
        debug!("elastic driver: search body {body}");
        let types: Vec<&str> = request.types.iter().map(String::as_str).collect();
        let response = self.client.search(&self.index, &types, &body)?;
        SearchResponse::parse(&response)
    }
}

impl QueryFactory for ElasticDriver {}

impl Driver for ElasticDriver {
    fn name(&self) -> &str {
        "elastic"
    }

    fn as_query_factory(&self) -> &dyn QueryFactory {
        self
    }

    fn get(&self, types: &[&str], clauses: &[QueryClause]) -> Result<ResultCollection> {
        let response = self.search(&SearchRequest::from_clauses(types, clauses))?;

        let mut results = ResultCollection::new(response.hits);
        results.set_query_stats(response.total_hits, response.max_score, response.took);
        Ok(results)
    }

    fn paginate(
        &self,
        types: &[&str],
        clauses: &[QueryClause],
        page: usize,
        per_page: usize,
        offset: Option<usize>,
    ) -> Result<PagedResultCollection> {
        let window = PageWindow::new(page, per_page, offset);
        let request =
            SearchRequest::from_clauses(types, clauses).with_window(window.from, window.per_page);
        let response = self.search(&request)?;

        let mut results = PagedResultCollection::new(
            response.hits,
            response.total_hits,
            window.per_page,
            window.page,
        );
        results.set_query_stats(response.total_hits, response.max_score, response.took);
        Ok(results)
    }

    fn add(&self, category: &str, id: &DocumentId, data: Attributes) -> Result<&dyn Driver> {
        self.client
            .index(&self.index, category, &id.as_key(), &Value::Object(data))?;
        self.client.refresh(&self.index)?;
        Ok(self)
    }

    fn add_multiple(&self, category: &str, documents: DocumentBatch) -> Result<&dyn Driver> {
        if documents.is_empty() {
            return Ok(self);
        }

        let count = documents.len();
        let mut operations = Vec::with_capacity(count * 2);
        for (id, attributes) in documents {
            operations.push(json!({
                "index": { "_index": self.index, "_type": category, "_id": id.as_key() }
            }));
            operations.push(Value::Object(attributes));
        }

        let response = self.client.bulk(&operations)?;
        if let Some(error) = bulk_error(&response) {
            return Err(SearchlightError::backend(format!(
                "bulk indexing into '{category}' failed: {error}"
            )));
        }
        self.client.refresh(&self.index)?;
        info!("elastic driver: indexed {count} documents into '{category}'");
        Ok(self)
    }

    fn delete(&self, category: &str, id: &DocumentId) -> Result<&dyn Driver> {
        let key = id.as_key();
        let response = self.client.delete(&self.index, category, &key)?;
        if is_not_found(&response) {
            return Err(SearchlightError::not_found(format!(
                "document '{key}' in category '{category}'"
            )));
        }
        self.client.refresh(&self.index)?;
        Ok(self)
    }
}
