//! Flattened, backend-neutral search request.

use serde_json::{Map, Value, json};

use crate::query::clause::{Occur, QueryClause};
use crate::query::kind::QueryKind;

/// A clause sequence grouped by role, plus the result window.
///
/// Grouping keeps the relative order of clauses within each role.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRequest {
    /// Categories to search; empty means every category.
    pub types: Vec<String>,
    /// Required clauses.
    pub must: Vec<QueryKind>,
    /// Optional clauses.
    pub should: Vec<QueryKind>,
    /// Excluding clauses.
    pub must_not: Vec<QueryKind>,
    /// Offset of the first returned hit.
    pub from: usize,
    /// Maximum number of returned hits; `None` returns every hit.
    pub size: Option<usize>,
}

impl SearchRequest {
    /// Group `clauses` by role.
    pub fn from_clauses(types: &[&str], clauses: &[QueryClause]) -> Self {
        let mut request = SearchRequest {
            types: types.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };

        for clause in clauses {
            let query = clause.query().clone();
            match clause.occur() {
                Occur::Must => request.must.push(query),
                Occur::Should => request.should.push(query),
                Occur::MustNot => request.must_not.push(query),
            }
        }

        request
    }

    /// Restrict the result window.
    pub fn with_window(mut self, from: usize, size: usize) -> Self {
        self.from = from;
        self.size = Some(size);
        self
    }

    /// Number of SHOULD clauses a document has to match: one when there is
    /// no MUST clause, none otherwise.
    pub fn minimum_should_match(&self) -> usize {
        usize::from(self.must.is_empty() && !self.should.is_empty())
    }

    /// Whether the request has no clause at all (matches every document).
    pub fn is_match_all(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    /// Render the request body in the Elasticsearch query DSL.
    pub fn to_json(&self) -> Value {
        let query = if self.is_match_all() {
            json!({ "match_all": {} })
        } else {
            let mut bool_query = Map::new();
            for (key, group) in [
                (Occur::Must, &self.must),
                (Occur::Should, &self.should),
                (Occur::MustNot, &self.must_not),
            ] {
                if !group.is_empty() {
                    bool_query.insert(
                        key.as_str().to_string(),
                        Value::Array(group.iter().map(QueryKind::to_json).collect()),
                    );
                }
            }
            if !self.should.is_empty() {
                bool_query.insert(
                    "minimum_should_match".to_string(),
                    json!(self.minimum_should_match()),
                );
            }
            json!({ "bool": bool_query })
        };

        let mut body = json!({ "query": query });
        if self.from > 0 {
            body["from"] = json!(self.from);
        }
        if let Some(size) = self.size {
            body["size"] = json!(size);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::builder::QueryBuilder;
    use crate::query::match_query::MatchOptions;

    #[test]
    fn test_clauses_grouped_by_role() {
        let mut builder = QueryBuilder::standard();
        builder.term("a", 1).must();
        builder.term("b", 2);
        builder.term("c", 3).must_not();
        builder.term("d", 4).must();

        let request = SearchRequest::from_clauses(&["books"], builder.clauses());
        assert_eq!(request.types, vec!["books".to_string()]);
        assert_eq!(request.must.len(), 2);
        assert_eq!(request.should.len(), 1);
        assert_eq!(request.must_not.len(), 1);
        assert_eq!(request.minimum_should_match(), 0);
    }

    #[test]
    fn test_should_only_requires_one() {
        let mut builder = QueryBuilder::standard();
        builder.term("a", 1);
        let request = SearchRequest::from_clauses(&[], builder.clauses());
        assert_eq!(request.minimum_should_match(), 1);
    }

    #[test]
    fn test_request_json() {
        let mut builder = QueryBuilder::standard();
        builder
            .match_query("name", "Test", MatchOptions::default())
            .must();
        builder.term("category", "book");

        let body = SearchRequest::from_clauses(&[], builder.clauses())
            .with_window(10, 5)
            .to_json();

        assert_eq!(body["from"], 10);
        assert_eq!(body["size"], 5);
        assert_eq!(body["query"]["bool"]["must"][0]["match_phrase"]["name"]["query"], "Test");
        assert_eq!(body["query"]["bool"]["should"][0]["term"]["category"], "book");
        assert_eq!(body["query"]["bool"]["minimum_should_match"], 0);
        assert!(body["query"]["bool"].get("must_not").is_none());
    }

    #[test]
    fn test_empty_request_is_match_all() {
        let request = SearchRequest::from_clauses(&[], &[]);
        assert!(request.is_match_all());
        assert_eq!(request.to_json(), json!({"query": {"match_all": {}}}));
    }
}
