//! Result collections annotated with query statistics.

use std::ops::Index;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::result::hit::SearchResult;
use crate::result::value::ResultValue;

/// Statistics reported for one executed query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryStats {
    /// Number of documents matching the query, regardless of windowing.
    pub total_hits: u64,
    /// Highest score among the matching documents.
    pub max_score: f32,
    /// Execution time in seconds.
    pub total_time: f64,
}

impl QueryStats {
    /// Clamp negative inputs to zero.
    pub fn new(total_hits: u64, max_score: f32, total_time: f64) -> Self {
        QueryStats {
            total_hits,
            max_score: max_score.max(0.0),
            total_time: total_time.max(0.0),
        }
    }
}

/// Shared statistics contract of plain and paged collections.
pub trait QueryStatistics {
    /// Record the statistics of the execution that produced the collection.
    fn set_query_stats(&mut self, total_hits: u64, max_score: f32, total_time: f64);

    /// The recorded statistics.
    fn query_stats(&self) -> QueryStats;

    /// Number of documents matching the query.
    fn total_hits(&self) -> u64 {
        self.query_stats().total_hits
    }

    /// Highest score among the matching documents.
    fn max_score(&self) -> f32 {
        self.query_stats().max_score
    }

    /// Execution time in seconds.
    fn total_time(&self) -> f64 {
        self.query_stats().total_time
    }
}

/// Ordered search results.
///
/// # Examples
///
/// ```
/// use searchlight::document::attributes;
/// use searchlight::result::{QueryStatistics, ResultCollection, SearchResult};
/// use serde_json::json;
///
/// let mut results = ResultCollection::new(vec![
///     SearchResult::from_hit("1", "books", 2.0, attributes(json!({"title": "Dune"}))),
/// ]);
/// results.set_query_stats(1, 2.0, 0.004);
///
/// assert_eq!(results.len(), 1);
/// assert_eq!(results.total_hits(), 1);
/// assert_eq!(results.ids(), vec!["1".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultCollection {
    items: Vec<SearchResult>,
    stats: QueryStats,
}

impl ResultCollection {
    /// Wrap already decorated results.
    pub fn new(items: Vec<SearchResult>) -> Self {
        ResultCollection {
            items,
            stats: QueryStats::default(),
        }
    }

    /// Collection without any result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Results in rank order.
    pub fn items(&self) -> &[SearchResult] {
        &self.items
    }

    /// Iterate over the results.
    pub fn iter(&self) -> slice::Iter<'_, SearchResult> {
        self.items.iter()
    }

    /// Number of results held (not the total hit count).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no result is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First result, if any.
    pub fn first(&self) -> Option<&SearchResult> {
        self.items.first()
    }

    /// Ids of the held results, for "id among these results" filtering.
    /// Results without an id are skipped.
    pub fn ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.id().map(str::to_string))
            .collect()
    }

    /// One attribute of every result, in rank order.
    pub fn pluck(&self, key: &str) -> Vec<&ResultValue> {
        self.items.iter().map(|item| item.get(key)).collect()
    }

    /// Consume the collection.
    pub fn into_items(self) -> Vec<SearchResult> {
        self.items
    }
}

impl QueryStatistics for ResultCollection {
    fn set_query_stats(&mut self, total_hits: u64, max_score: f32, total_time: f64) {
        self.stats = QueryStats::new(total_hits, max_score, total_time);
    }

    fn query_stats(&self) -> QueryStats {
        self.stats
    }
}

impl Index<usize> for ResultCollection {
    type Output = SearchResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl IntoIterator for ResultCollection {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a SearchResult;
    type IntoIter = slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One page of search results.
///
/// `page` is at least 1 and never more than `per_page` items are held;
/// `total` is the number of matching documents over all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResultCollection {
    items: ResultCollection,
    page: usize,
    per_page: usize,
    total: u64,
}

impl PagedResultCollection {
    /// Build a page; extra items beyond `per_page` are dropped.
    pub fn new(mut items: Vec<SearchResult>, total: u64, per_page: usize, page: usize) -> Self {
        let per_page = per_page.max(1);
        items.truncate(per_page);
        PagedResultCollection {
            items: ResultCollection::new(items),
            page: page.max(1),
            per_page,
            total,
        }
    }

    /// Empty first page.
    pub fn empty(per_page: usize) -> Self {
        Self::new(Vec::new(), 0, per_page, 1)
    }

    /// Results of this page in rank order.
    pub fn items(&self) -> &[SearchResult] {
        self.items.items()
    }

    /// Iterate over the results of this page.
    pub fn iter(&self) -> slice::Iter<'_, SearchResult> {
        self.items.iter()
    }

    /// Number of results on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no result.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Total matching documents over all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of the last page (1 for an empty result).
    pub fn last_page(&self) -> usize {
        let total = usize::try_from(self.total).unwrap_or(usize::MAX);
        total.div_ceil(self.per_page).max(1)
    }

    /// Whether pages follow this one.
    pub fn has_more_pages(&self) -> bool {
        self.page < self.last_page()
    }

    /// Ids of the results on this page.
    pub fn ids(&self) -> Vec<String> {
        self.items.ids()
    }

    /// The page as a plain collection.
    pub fn as_collection(&self) -> &ResultCollection {
        &self.items
    }
}

impl QueryStatistics for PagedResultCollection {
    fn set_query_stats(&mut self, total_hits: u64, max_score: f32, total_time: f64) {
        self.items.set_query_stats(total_hits, max_score, total_time);
    }

    fn query_stats(&self) -> QueryStats {
        self.items.query_stats()
    }
}

impl Index<usize> for PagedResultCollection {
    type Output = SearchResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a PagedResultCollection {
    type Item = &'a SearchResult;
    type IntoIter = slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
