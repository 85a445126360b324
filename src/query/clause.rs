//! Boolean clauses: one query plus its occurrence role.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::kind::QueryKind;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR); required only when no
    /// MUST clause exists.
    #[default]
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

impl Occur {
    /// Wire token: `must`, `should` or `must_not`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
        }
    }
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clause in a boolean query.
///
/// Created by the [`QueryBuilder`](crate::query::QueryBuilder) factory
/// methods with a SHOULD role; the role setters return the same clause so
/// calls can be chained.
///
/// # Examples
///
/// ```
/// use searchlight::query::{Occur, QueryBuilder};
///
/// let mut builder = QueryBuilder::standard();
/// builder.match_all().must().should().must_not();
/// assert_eq!(builder.clauses()[0].occur(), Occur::MustNot);
/// assert_eq!(builder.clauses()[0].occur_type(), "must_not");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryClause {
    query: QueryKind,
    occur: Occur,
}

impl QueryClause {
    /// Create a SHOULD clause.
    pub fn new(query: QueryKind) -> Self {
        QueryClause {
            query,
            occur: Occur::Should,
        }
    }

    /// Create a clause with an explicit role.
    pub fn with_occur(query: QueryKind, occur: Occur) -> Self {
        QueryClause { query, occur }
    }

    /// Make the clause required.
    pub fn must(&mut self) -> &mut Self {
        self.occur = Occur::Must;
        self
    }

    /// Make the clause optional (the default).
    pub fn should(&mut self) -> &mut Self {
        self.occur = Occur::Should;
        self
    }

    /// Make the clause exclude matching documents.
    pub fn must_not(&mut self) -> &mut Self {
        self.occur = Occur::MustNot;
        self
    }

    /// The wrapped query.
    pub fn query(&self) -> &QueryKind {
        &self.query
    }

    /// The current role.
    pub fn occur(&self) -> Occur {
        self.occur
    }

    /// The current role as a wire token.
    pub fn occur_type(&self) -> &'static str {
        self.occur.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::kind::MatchAllQuery;

    #[test]
    fn test_default_role_is_should() {
        let clause = QueryClause::new(QueryKind::MatchAll(MatchAllQuery));
        assert_eq!(clause.occur(), Occur::Should);
        assert_eq!(clause.occur_type(), "should");
    }

    #[test]
    fn test_last_role_wins() {
        let mut clause = QueryClause::new(QueryKind::MatchAll(MatchAllQuery));
        clause.must().should().must_not();
        assert_eq!(clause.occur(), Occur::MustNot);

        clause.must_not().must_not();
        assert_eq!(clause.occur(), Occur::MustNot);

        clause.must();
        assert_eq!(clause.occur_type(), "must");
    }

    #[test]
    fn test_occur_serialization() {
        assert_eq!(serde_json::to_string(&Occur::MustNot).unwrap(), "\"must_not\"");
        assert_eq!(Occur::default(), Occur::Should);
    }
}
