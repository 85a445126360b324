//! In-process search backend.
//!
//! Documents are kept per category in memory. Writes are staged and only
//! become searchable on [`MemoryDriver::refresh`]; `add` refreshes after
//! each document and `add_multiple` once after the whole batch.

mod matcher;

use std::time::Instant;

use ahash::AHashMap;
use log::{debug, info};
use parking_lot::RwLock;

use crate::analysis::Analyzer;
use crate::document::{Attributes, DocumentBatch, DocumentId};
use crate::driver::{Driver, PageWindow};
use crate::error::{Result, SearchlightError};
use crate::query::{QueryClause, QueryFactory, QueryKind, SearchRequest};
use crate::result::{PagedResultCollection, QueryStatistics, ResultCollection, SearchResult};

use self::matcher::{Evaluator, Prepared};

/// A committed document.
#[derive(Debug, Clone)]
struct StoredDocument {
    id: DocumentId,
    /// Insertion sequence, used to order equally scored hits.
    seq: u64,
    attributes: Attributes,
}

#[derive(Debug, Clone)]
enum PendingOp {
    Upsert {
        category: String,
        id: DocumentId,
        attributes: Attributes,
    },
    Delete {
        category: String,
        key: String,
    },
}

#[derive(Debug, Default)]
struct MemoryState {
    categories: AHashMap<String, AHashMap<String, StoredDocument>>,
    pending: Vec<PendingOp>,
    next_seq: u64,
}

impl MemoryState {
    fn contains(&self, category: &str, key: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|documents| documents.contains_key(key))
    }

    fn apply_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let applied = pending.len();
        for op in pending {
            match op {
                PendingOp::Upsert {
                    category,
                    id,
                    attributes,
                } => {
                    let key = id.as_key();
                    let documents = self.categories.entry(category).or_default();
                    match documents.get_mut(&key) {
                        Some(existing) => {
                            existing.id = id;
                            existing.attributes = attributes;
                        }
                        None => {
                            let seq = self.next_seq;
                            self.next_seq += 1;
                            documents.insert(
                                key,
                                StoredDocument {
                                    id,
                                    seq,
                                    attributes,
                                },
                            );
                        }
                    }
                }
                PendingOp::Delete { category, key } => {
                    if let Some(documents) = self.categories.get_mut(&category) {
                        documents.remove(&key);
                    }
                }
            }
        }
        applied
    }
}

/// Scored hit before decoration.
struct Hit<'s> {
    category: &'s str,
    document: &'s StoredDocument,
    score: f32,
}

/// In-memory driver evaluating every query kind in process.
///
/// # Examples
///
/// ```
/// use searchlight::document::{DocumentId, attributes};
/// use searchlight::driver::{Driver, MemoryDriver};
/// use searchlight::result::QueryStatistics;
/// use serde_json::json;
///
/// let driver = MemoryDriver::new();
/// driver
///     .add("books", &DocumentId::from(1), attributes(json!({"title": "Dune"})))
///     .unwrap();
///
/// let mut builder = driver.query_builder();
/// builder.match_all();
/// let results = driver.get(&["books"], builder.clauses()).unwrap();
/// assert_eq!(results.total_hits(), 1);
/// assert_eq!(results[0].get("title").as_text(), Some("Dune"));
/// ```
#[derive(Debug)]
pub struct MemoryDriver {
    analyzer: Analyzer,
    state: RwLock<MemoryState>,
}

impl MemoryDriver {
    /// Driver with the standard analyzer.
    pub fn new() -> Self {
        Self::with_analyzer(Analyzer::standard())
    }

    /// Driver with a custom analyzer.
    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        MemoryDriver {
            analyzer,
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Stage an upsert without making it searchable.
    pub fn stage(&self, category: &str, id: &DocumentId, data: Attributes) {
        self.state.write().pending.push(PendingOp::Upsert {
            category: category.to_string(),
            id: id.clone(),
            attributes: data,
        });
    }

    /// Make every staged write searchable. Returns the number of applied
    /// operations.
    pub fn refresh(&self) -> usize {
        let applied = self.state.write().apply_pending();
        if applied > 0 {
            debug!("memory driver: refreshed {applied} pending operations");
        }
        applied
    }

    /// Number of staged, not yet searchable writes.
    pub fn pending_count(&self) -> usize {
        self.state.read().pending.len()
    }

    /// Number of searchable documents in `category`.
    pub fn document_count(&self, category: &str) -> usize {
        self.state
            .read()
            .categories
            .get(category)
            .map_or(0, |documents| documents.len())
    }

    /// Names of the categories holding searchable documents, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .read()
            .categories
            .iter()
            .filter(|(_, documents)| !documents.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Evaluate `request` and decorate the hits in its window.
    fn execute(&self, request: &SearchRequest) -> Result<(Vec<SearchResult>, u64, f32)> {
        let state = self.state.read();

        let mut candidates: Vec<(&str, &StoredDocument)> = Vec::new();
        for (category, documents) in &state.categories {
            if !request.types.is_empty() && !request.types.iter().any(|t| t == category) {
                continue;
            }
            candidates.extend(documents.values().map(|doc| (category.as_str(), doc)));
        }

        let queries: Vec<&QueryKind> = request
            .must
            .iter()
            .chain(&request.should)
            .chain(&request.must_not)
            .collect();
        let corpus: Vec<&Attributes> = candidates.iter().map(|(_, doc)| &doc.attributes).collect();
        let evaluator = Evaluator::new(&self.analyzer, &queries, &corpus);

        let must = prepare_all(&evaluator, &request.must)?;
        let should = prepare_all(&evaluator, &request.should)?;
        let must_not = prepare_all(&evaluator, &request.must_not)?;
        let minimum_should_match = request.minimum_should_match();
        let scored_clauses = !(must.is_empty() && should.is_empty());

        let mut hits: Vec<Hit<'_>> = Vec::new();
        'documents: for (category, document) in candidates {
            let attributes = &document.attributes;
            if must_not
                .iter()
                .any(|query| evaluator.score(query, attributes).is_some())
            {
                continue;
            }

            let mut score = 0.0f32;
            for query in &must {
                match evaluator.score(query, attributes) {
                    Some(clause_score) => score += clause_score,
                    None => continue 'documents,
                }
            }

            let mut matched_should = 0;
            for query in &should {
                if let Some(clause_score) = evaluator.score(query, attributes) {
                    score += clause_score;
                    matched_should += 1;
                }
            }
            if matched_should < minimum_should_match {
                continue;
            }

            hits.push(Hit {
                category,
                document,
                score: if scored_clauses { score } else { 1.0 },
            });
        }

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.document.seq.cmp(&b.document.seq))
        });

        let total_hits = hits.len() as u64;
        let max_score = hits.first().map_or(0.0, |hit| hit.score);
        let window = hits
            .into_iter()
            .skip(request.from)
            .take(request.size.unwrap_or(usize::MAX))
            .map(|hit| {
                SearchResult::from_hit(
                    hit.document.id.as_key(),
                    hit.category,
                    hit.score,
                    hit.document.attributes.clone(),
                )
            })
            .collect();

        Ok((window, total_hits, max_score))
    }
}

fn prepare_all<'q>(evaluator: &Evaluator<'_>, group: &'q [QueryKind]) -> Result<Vec<Prepared<'q>>> {
    group.iter().map(|query| evaluator.prepare(query)).collect()
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryFactory for MemoryDriver {}

impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    fn as_query_factory(&self) -> &dyn QueryFactory {
        self
    }

    fn get(&self, types: &[&str], clauses: &[QueryClause]) -> Result<ResultCollection> {
        let start = Instant::now();
        let request = SearchRequest::from_clauses(types, clauses);
        let (items, total_hits, max_score) = self.execute(&request)?;

        let mut results = ResultCollection::new(items);
        results.set_query_stats(total_hits, max_score, start.elapsed().as_secs_f64());
        debug!(
            "memory driver: {} clauses over {:?} matched {total_hits} documents",
            clauses.len(),
            types
        );
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
        let start = Instant::now();
        let window = PageWindow::new(page, per_page, offset);
        let request =
            SearchRequest::from_clauses(types, clauses).with_window(window.from, window.per_page);
        let (items, total_hits, max_score) = self.execute(&request)?;

        let mut results =
            PagedResultCollection::new(items, total_hits, window.per_page, window.page);
        results.set_query_stats(total_hits, max_score, start.elapsed().as_secs_f64());
        Ok(results)
    }

    fn add(&self, category: &str, id: &DocumentId, data: Attributes) -> Result<&dyn Driver> {
        self.stage(category, id, data);
        self.refresh();
        Ok(self)
    }

    fn add_multiple(&self, category: &str, documents: DocumentBatch) -> Result<&dyn Driver> {
        let count = documents.len();
        {
            let mut state = self.state.write();
            state
                .pending
                .extend(documents.into_iter().map(|(id, attributes)| PendingOp::Upsert {
                    category: category.to_string(),
                    id,
                    attributes,
                }));
        }
        self.refresh();
        info!("memory driver: indexed {count} documents into '{category}'");
        Ok(self)
    }

    fn delete(&self, category: &str, id: &DocumentId) -> Result<&dyn Driver> {
        let key = id.as_key();
        {
            let mut state = self.state.write();
            if !state.contains(category, &key) {
                return Err(SearchlightError::not_found(format!(
                    "document '{key}' in category '{category}'"
                )));
            }
            state.pending.push(PendingOp::Delete {
                category: category.to_string(),
                key,
            });
        }
        self.refresh();
        Ok(self)
    }
}
