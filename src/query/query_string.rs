//! Query-string query with a small Lucene-like syntax.
//!
//! Supported syntax:
//!
//! - `word` and `"a phrase"`: optional terms (any may match)
//! - `field:word`, `field:"a phrase"`: restrict a term to one field
//! - `+word` / `-word`: required / prohibited term
//! - `NOT word`: prohibited term
//! - `a AND b`: both terms required; `OR` is accepted and ignored

use serde_json::{Value, json};

use crate::query::clause::Occur;

/// One parsed term of a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStringTerm {
    /// Field restriction; `None` searches every field.
    pub field: Option<String>,
    /// Term or phrase text, without quotes.
    pub text: String,
    /// Whether the text was quoted.
    pub phrase: bool,
    /// Role of the term.
    pub occur: Occur,
}

/// Raw query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStringQuery {
    query: String,
}

impl QueryStringQuery {
    /// Create a new query-string query.
    pub fn new<S: Into<String>>(query: S) -> Self {
        QueryStringQuery {
            query: query.into(),
        }
    }

    /// Raw query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Parse the query string into terms.
    ///
    /// # Examples
    ///
    /// ```
    /// use searchlight::query::{Occur, QueryStringQuery};
    ///
    /// let terms = QueryStringQuery::new(r#"+title:rust -draft "async io""#).parse();
    /// assert_eq!(terms.len(), 3);
    /// assert_eq!(terms[0].field.as_deref(), Some("title"));
    /// assert_eq!(terms[0].occur, Occur::Must);
    /// assert_eq!(terms[1].occur, Occur::MustNot);
    /// assert!(terms[2].phrase);
    /// ```
    pub fn parse(&self) -> Vec<QueryStringTerm> {
        let mut terms: Vec<QueryStringTerm> = Vec::new();
        let mut pending_required = false;
        let mut pending_prohibited = false;

        for raw in split_terms(&self.query) {
            match raw.as_str() {
                "AND" => {
                    if let Some(last) = terms.last_mut() {
                        if last.occur == Occur::Should {
                            last.occur = Occur::Must;
                        }
                    }
                    pending_required = true;
                    continue;
                }
                "OR" => continue,
                "NOT" => {
                    pending_prohibited = true;
                    continue;
                }
                _ => {}
            }

            let (mut occur, body) = match raw.strip_prefix('+') {
                Some(rest) if !rest.is_empty() => (Occur::Must, rest),
                _ => match raw.strip_prefix('-') {
                    Some(rest) if !rest.is_empty() => (Occur::MustNot, rest),
                    _ => (Occur::Should, raw.as_str()),
                },
            };

            if pending_prohibited {
                occur = Occur::MustNot;
            } else if pending_required && occur == Occur::Should {
                occur = Occur::Must;
            }
            pending_required = false;
            pending_prohibited = false;

            let (field, text) = split_field(body);
            let (text, phrase) = match text.strip_prefix('"') {
                Some(inner) => (inner.strip_suffix('"').unwrap_or(inner), true),
                None => (text, false),
            };

            if text.trim().is_empty() {
                continue;
            }

            terms.push(QueryStringTerm {
                field: field.map(str::to_string),
                text: text.to_string(),
                phrase,
                occur,
            });
        }

        terms
    }

    pub(crate) fn to_json(&self) -> Value {
        json!({ "query_string": { "query": self.query } })
    }
}

/// Split on whitespace outside of double quotes.
fn split_terms(input: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        terms.push(current);
    }

    terms
}

/// Split `field:text`, ignoring colons inside a quoted phrase.
fn split_field(term: &str) -> (Option<&str>, &str) {
    match term.find(':') {
        Some(index) if index > 0 && !term[..index].contains('"') => {
            (Some(&term[..index]), &term[index + 1..])
        }
        _ => (None, term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_terms_are_optional() {
        let terms = QueryStringQuery::new("rust  search").parse();
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().all(|t| t.occur == Occur::Should && t.field.is_none()));
    }

    #[test]
    fn test_and_not_keywords() {
        let terms = QueryStringQuery::new("rust AND search NOT java OR go").parse();
        let occurs: Vec<_> = terms.iter().map(|t| t.occur).collect();
        assert_eq!(
            occurs,
            vec![Occur::Must, Occur::Must, Occur::MustNot, Occur::Should]
        );
    }

    #[test]
    fn test_quoted_phrase_with_field() {
        let terms = QueryStringQuery::new(r#"title:"hello: world""#).parse();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].field.as_deref(), Some("title"));
        assert_eq!(terms[0].text, "hello: world");
        assert!(terms[0].phrase);
    }

    #[test]
    fn test_lone_operators_are_terms() {
        let terms = QueryStringQuery::new("- +").parse();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].text, "-");
    }
}
