//! Fluent query builder.

use serde_json::Value;

use crate::error::Result;
use crate::query::clause::QueryClause;
use crate::query::common::CommonOptions;
use crate::query::factory::{QueryFactory, StandardQueryFactory};
use crate::query::fuzzy::FuzzyOptions;
use crate::query::kind::QueryKind;
use crate::query::match_query::{MatchOptions, MultiMatchOptions};
use crate::query::range::{Bounds, RangeOptions};
use crate::query::wildcard::WildcardOptions;
use crate::query::{normalize_values, value_to_text};

/// Accumulates an ordered sequence of [`QueryClause`]s.
///
/// Each factory method appends exactly one clause (SHOULD by default) and
/// returns it, so its role can be set in the same expression. Earlier
/// clauses are never touched.
///
/// # Examples
///
/// ```
/// use searchlight::query::{MatchOptions, Occur, QueryBuilder};
///
/// let mut builder = QueryBuilder::standard();
/// builder
///     .match_query("name", "Test", MatchOptions { fuzzy: true, ..Default::default() })
///     .must();
/// builder.match_query("category", "book", MatchOptions::default());
///
/// assert_eq!(builder.len(), 2);
/// assert_eq!(builder.clauses()[0].occur(), Occur::Must);
/// assert_eq!(builder.clauses()[1].occur(), Occur::Should);
/// ```
pub struct QueryBuilder<'a> {
    factory: &'a dyn QueryFactory,
    clauses: Vec<QueryClause>,
}

impl QueryBuilder<'static> {
    /// Builder using the standard query factory.
    pub fn standard() -> Self {
        QueryBuilder::new(&StandardQueryFactory)
    }
}

impl<'a> QueryBuilder<'a> {
    /// Builder constructing its queries through `factory`.
    pub fn new(factory: &'a dyn QueryFactory) -> Self {
        QueryBuilder {
            factory,
            clauses: Vec::new(),
        }
    }

    /// Append a pre-built query as a SHOULD clause.
    pub fn push<Q: Into<QueryKind>>(&mut self, query: Q) -> &mut QueryClause {
        self.clauses.push(QueryClause::new(query.into()));
        let last = self.clauses.len() - 1;
        &mut self.clauses[last]
    }

    /// Match one value, or any value of a list, against `field`.
    pub fn match_query<V: Into<Value>>(
        &mut self,
        field: &str,
        values: V,
        options: MatchOptions,
    ) -> &mut QueryClause {
        let query = self
            .factory
            .match_query(field, normalize_values(values.into()), options, None);
        self.push(query)
    }

    /// Match `value` against several fields.
    pub fn multi_match<S: AsRef<str>>(
        &mut self,
        fields: &[S],
        value: &str,
        options: MultiMatchOptions,
    ) -> &mut QueryClause {
        let fields = fields.iter().map(|f| f.as_ref().to_string()).collect();
        let query = self.factory.multi_match(fields, value, options, None);
        self.push(query)
    }

    /// Approximate term match.
    pub fn fuzzy(&mut self, field: &str, value: &str, options: FuzzyOptions) -> &mut QueryClause {
        let query = self.factory.fuzzy(field, value, options, None);
        self.push(query)
    }

    /// Common-terms match.
    pub fn common(&mut self, field: &str, value: &str, options: CommonOptions) -> &mut QueryClause {
        let query = self.factory.common(field, value, options, None);
        self.push(query)
    }

    /// Match every document.
    pub fn match_all(&mut self) -> &mut QueryClause {
        let query = self.factory.match_all(None);
        self.push(query)
    }

    /// Value range; fails with `InvalidRange` before appending anything
    /// when `bounds` is empty.
    pub fn range(
        &mut self,
        field: &str,
        bounds: Bounds,
        options: RangeOptions,
    ) -> Result<&mut QueryClause> {
        let query = self.factory.range(field, bounds, options, None)?;
        Ok(self.push(query))
    }

    /// Prefix match; `prefixes` is a single value or a list.
    pub fn prefix<V: Into<Value>>(&mut self, field: &str, prefixes: V) -> &mut QueryClause {
        let prefixes = normalize_values(prefixes.into())
            .iter()
            .filter_map(value_to_text)
            .collect();
        let query = self.factory.prefix(field, prefixes, None);
        self.push(query)
    }

    /// Regular expression match; fails when the pattern is invalid.
    pub fn regexp(&mut self, field: &str, pattern: &str) -> Result<&mut QueryClause> {
        let query = self.factory.regexp(field, pattern, None)?;
        Ok(self.push(query))
    }

    /// Exact value match.
    pub fn term<V: Into<Value>>(&mut self, field: &str, value: V) -> &mut QueryClause {
        let query = self.factory.term(field, value.into(), None);
        self.push(query)
    }

    /// Exact match against any value of a list.
    pub fn terms<V: Into<Value>>(&mut self, field: &str, values: V) -> &mut QueryClause {
        let query = self
            .factory
            .terms(field, normalize_values(values.into()), None);
        self.push(query)
    }

    /// Wildcard pattern match.
    pub fn wildcard(
        &mut self,
        field: &str,
        pattern: &str,
        options: WildcardOptions,
    ) -> Result<&mut QueryClause> {
        let query = self.factory.wildcard(field, pattern, options, None)?;
        Ok(self.push(query))
    }

    /// Query-string match.
    pub fn query_string(&mut self, query: &str) -> &mut QueryClause {
        let query = self.factory.query_string(query, None);
        self.push(query)
    }

    /// Clauses in insertion order.
    pub fn clauses(&self) -> &[QueryClause] {
        &self.clauses
    }

    /// Consume the builder, yielding its clauses.
    pub fn into_clauses(self) -> Vec<QueryClause> {
        self.clauses
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether no clause has been added.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl std::fmt::Debug for QueryBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("clauses", &self.clauses)
            .finish()
    }
}
