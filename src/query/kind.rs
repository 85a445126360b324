//! The closed set of query kinds a clause can carry.

use serde_json::{Value, json};

use crate::query::common::CommonTermsQuery;
use crate::query::fuzzy::FuzzyQuery;
use crate::query::match_query::{MatchQuery, MultiMatchQuery};
use crate::query::query_string::QueryStringQuery;
use crate::query::range::RangeQuery;
use crate::query::regexp::RegexpQuery;
use crate::query::term::{PrefixQuery, TermQuery, TermsQuery};
use crate::query::wildcard::WildcardQuery;

/// Matches every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchAllQuery;

/// One backend query, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryKind {
    /// Full-text match on one field.
    Match(MatchQuery),
    /// Full-text match on several fields.
    MultiMatch(MultiMatchQuery),
    /// Approximate term match.
    Fuzzy(FuzzyQuery),
    /// Common-terms match.
    Common(CommonTermsQuery),
    /// Every document.
    MatchAll(MatchAllQuery),
    /// Value range.
    Range(RangeQuery),
    /// Value or term prefix.
    Prefix(PrefixQuery),
    /// Regular expression.
    Regexp(RegexpQuery),
    /// Exact value.
    Term(TermQuery),
    /// Exact value among a list.
    Terms(TermsQuery),
    /// Wildcard pattern.
    Wildcard(WildcardQuery),
    /// Query-string syntax.
    QueryString(QueryStringQuery),
}

impl QueryKind {
    /// Kind name, as used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Match(_) => "match",
            QueryKind::MultiMatch(_) => "multi_match",
            QueryKind::Fuzzy(_) => "fuzzy",
            QueryKind::Common(_) => "common",
            QueryKind::MatchAll(_) => "match_all",
            QueryKind::Range(_) => "range",
            QueryKind::Prefix(_) => "prefix",
            QueryKind::Regexp(_) => "regexp",
            QueryKind::Term(_) => "term",
            QueryKind::Terms(_) => "terms",
            QueryKind::Wildcard(_) => "wildcard",
            QueryKind::QueryString(_) => "query_string",
        }
    }

    /// Render the query in the Elasticsearch query DSL.
    pub fn to_json(&self) -> Value {
        match self {
            QueryKind::Match(query) => query.to_json(),
            QueryKind::MultiMatch(query) => query.to_json(),
            QueryKind::Fuzzy(query) => query.to_json(),
            QueryKind::Common(query) => query.to_json(),
            QueryKind::MatchAll(_) => json!({ "match_all": {} }),
            QueryKind::Range(query) => query.to_json(),
            QueryKind::Prefix(query) => query.to_json(),
            QueryKind::Regexp(query) => query.to_json(),
            QueryKind::Term(query) => query.to_json(),
            QueryKind::Terms(query) => query.to_json(),
            QueryKind::Wildcard(query) => query.to_json(),
            QueryKind::QueryString(query) => query.to_json(),
        }
    }
}

macro_rules! impl_from_query {
    ($($variant:ident => $query:ty),* $(,)?) => {
        $(
            impl From<$query> for QueryKind {
                fn from(query: $query) -> Self {
                    QueryKind::$variant(query)
                }
            }
        )*
    };
}

impl_from_query! {
    Match => MatchQuery,
    MultiMatch => MultiMatchQuery,
    Fuzzy => FuzzyQuery,
    Common => CommonTermsQuery,
    MatchAll => MatchAllQuery,
    Range => RangeQuery,
    Prefix => PrefixQuery,
    Regexp => RegexpQuery,
    Term => TermQuery,
    Terms => TermsQuery,
    Wildcard => WildcardQuery,
    QueryString => QueryStringQuery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(QueryKind::from(MatchAllQuery).name(), "match_all");
        assert_eq!(QueryKind::from(TermQuery::new("a", 1)).name(), "term");
        assert_eq!(QueryKind::from(QueryStringQuery::new("x")).name(), "query_string");
    }

    #[test]
    fn test_match_all_json() {
        assert_eq!(
            QueryKind::from(MatchAllQuery).to_json(),
            json!({"match_all": {}})
        );
    }
}
