//! Model-side indexing contract and the indexable-category registry.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use log::info;

use crate::document::{Attributes, DocumentBatch, DocumentId};
use crate::driver::Driver;
use crate::error::{Result, SearchlightError};

/// A model that can be indexed.
///
/// # Examples
///
/// ```
/// use searchlight::document::{Attributes, DocumentId, attributes};
/// use searchlight::searchable::Searchable;
/// use serde_json::json;
///
/// struct Book {
///     id: i64,
///     title: String,
/// }
///
/// impl Searchable for Book {
///     fn index_category(&self) -> String {
///         "books".to_string()
///     }
///
///     fn search_key(&self) -> DocumentId {
///         DocumentId::from(self.id)
///     }
///
///     fn indexable_attributes(&self) -> Attributes {
///         attributes(json!({ "title": self.title }))
///     }
/// }
///
/// let book = Book { id: 1, title: "Dune".to_string() };
/// assert_eq!(book.transformed_attributes()["title"], "Dune");
/// ```
pub trait Searchable {
    /// Category the model is indexed under.
    fn index_category(&self) -> String;

    /// Identifier of the model within its category.
    fn search_key(&self) -> DocumentId;

    /// Raw attributes to index.
    fn indexable_attributes(&self) -> Attributes;

    /// Attributes as sent to the driver; defaults to the raw attributes.
    fn transformed_attributes(&self) -> Attributes {
        self.indexable_attributes()
    }

    /// Whether deletions of this model are soft, so the indexed document
    /// must be kept.
    fn is_soft_delete_aware(&self) -> bool {
        false
    }
}

/// Supplies every record of one category for a full reindex.
pub trait IndexableSource: Send + Sync {
    /// Category the records belong to.
    fn category(&self) -> &str;

    /// Every record, keyed by id.
    fn records(&self) -> Result<DocumentBatch>;
}

impl<'a> fmt::Debug for dyn IndexableSource + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexableSource")
            .field("category", &self.category())
            .finish()
    }
}

/// [`IndexableSource`] backed by a loader returning models.
pub struct ModelSource<S, F> {
    category: String,
    load: F,
    _model: std::marker::PhantomData<fn() -> S>,
}

impl<S, F> ModelSource<S, F>
where
    S: Searchable,
    F: Fn() -> Result<Vec<S>> + Send + Sync,
{
    /// Source for `category` loading its models with `load`.
    pub fn new<C: Into<String>>(category: C, load: F) -> Self {
        ModelSource {
            category: category.into(),
            load,
            _model: std::marker::PhantomData,
        }
    }
}

impl<S, F> IndexableSource for ModelSource<S, F>
where
    S: Searchable,
    F: Fn() -> Result<Vec<S>> + Send + Sync,
{
    fn category(&self) -> &str {
        &self.category
    }

    fn records(&self) -> Result<DocumentBatch> {
        Ok((self.load)()?
            .into_iter()
            .map(|model| (model.search_key(), model.transformed_attributes()))
            .collect())
    }
}

impl<S, F> fmt::Debug for ModelSource<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSource")
            .field("category", &self.category)
            .finish()
    }
}

/// Outcome of reindexing one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexStats {
    /// Reindexed category.
    pub category: String,
    /// Number of documents sent to the driver.
    pub documents: usize,
    /// Number of `add_multiple` batches.
    pub batches: usize,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

/// Registry of indexable categories.
pub struct IndexableRegistry {
    sources: BTreeMap<String, Box<dyn IndexableSource>>,
    batch_size: usize,
}

impl IndexableRegistry {
    /// Default number of documents per `add_multiple` call during reindex.
    pub const DEFAULT_BATCH_SIZE: usize = 500;

    /// Empty registry.
    pub fn new() -> Self {
        IndexableRegistry {
            sources: BTreeMap::new(),
            batch_size: Self::DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the reindex batch size (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Register a source under its category, replacing any previous one.
    pub fn register<S: IndexableSource + 'static>(&mut self, source: S) -> &mut Self {
        self.sources
            .insert(source.category().to_string(), Box::new(source));
        self
    }

    /// Source of `category`.
    pub fn source(&self, category: &str) -> Result<&dyn IndexableSource> {
        self.sources
            .get(category)
            .map(|source| source.as_ref())
            .ok_or_else(|| {
                SearchlightError::indexable_model_not_set(format!(
                    "no indexable model registered for '{category}'"
                ))
            })
    }

    /// Registered categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Push every record of `category` to `driver`.
    pub fn reindex(&self, category: &str, driver: &dyn Driver) -> Result<ReindexStats> {
        let source = self.source(category)?;
        let start = Instant::now();
        let records = source.records()?;
        let documents = records.len();

        let mut batches = 0;
        let mut batch = DocumentBatch::new();
        for (id, attributes) in records {
            batch.insert(id, attributes);
            if batch.len() == self.batch_size {
                driver.add_multiple(category, std::mem::take(&mut batch))?;
                batches += 1;
            }
        }
        if !batch.is_empty() {
            driver.add_multiple(category, batch)?;
            batches += 1;
        }

        let stats = ReindexStats {
            category: category.to_string(),
            documents,
            batches,
            elapsed: start.elapsed(),
        };
        info!(
            "reindexed {} documents into '{}' in {} batches ({:?})",
            stats.documents, stats.category, stats.batches, stats.elapsed
        );
        Ok(stats)
    }

    /// Reindex every registered category.
    pub fn reindex_all(&self, driver: &dyn Driver) -> Result<Vec<ReindexStats>> {
        self.sources
            .keys()
            .map(|category| self.reindex(category, driver))
            .collect()
    }
}

impl Default for IndexableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IndexableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexableRegistry")
            .field("categories", &self.categories())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}
