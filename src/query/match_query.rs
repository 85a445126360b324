//! Match and multi-match queries.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::analysis::Analyzer;
use crate::query::fuzzy::Fuzziness;
use crate::query::{keyed, value_to_text};

/// Match type accepted by [`MatchQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// All terms in order, adjacent.
    #[default]
    Phrase,
    /// Like `Phrase`, with the last term matched as a prefix.
    PhrasePrefix,
}

impl MatchType {
    /// Wire name of this match type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Phrase => "phrase",
            MatchType::PhrasePrefix => "phrase_prefix",
        }
    }
}

/// Match type accepted by [`MultiMatchQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiMatchType {
    /// Score of the best matching field, plus `tie_breaker` times the others.
    BestFields,
    /// Sum of the scores of every matching field.
    MostFields,
    /// Terms may be spread over several fields; `operator` decides how many must match.
    CrossFields,
    /// Phrase match on any field.
    #[default]
    Phrase,
    /// Phrase-prefix match on any field.
    PhrasePrefix,
}

impl MultiMatchType {
    /// Wire name of this match type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiMatchType::BestFields => "best_fields",
            MultiMatchType::MostFields => "most_fields",
            MultiMatchType::CrossFields => "cross_fields",
            MultiMatchType::Phrase => "phrase",
            MultiMatchType::PhrasePrefix => "phrase_prefix",
        }
    }
}

/// Term combination operator for cross-field matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Every term must match.
    #[default]
    And,
    /// Any term may match.
    Or,
}

impl Operator {
    /// Wire name of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

/// Optional parameters of a match query.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchOptions {
    /// Match type (phrase by default).
    pub match_type: MatchType,
    /// Enable `AUTO` fuzziness.
    pub fuzzy: bool,
}

/// Optional parameters of a multi-match query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiMatchOptions {
    /// Match type (phrase by default).
    pub match_type: MultiMatchType,
    /// Enable `AUTO` fuzziness.
    pub fuzzy: bool,
    /// Only used with [`MultiMatchType::BestFields`].
    pub tie_breaker: f32,
    /// Only used with [`MultiMatchType::CrossFields`].
    pub operator: Operator,
}

impl Default for MultiMatchOptions {
    fn default() -> Self {
        MultiMatchOptions {
            match_type: MultiMatchType::default(),
            fuzzy: false,
            tie_breaker: 0.0,
            operator: Operator::And,
        }
    }
}

/// Full-text match of one or more values against a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    field: String,
    values: Vec<Value>,
    match_type: MatchType,
    fuzziness: Option<Fuzziness>,
}

impl MatchQuery {
    /// Create a phrase match query without fuzziness.
    pub fn new<S: Into<String>>(field: S, values: Vec<Value>) -> Self {
        MatchQuery {
            field: field.into(),
            values,
            match_type: MatchType::default(),
            fuzziness: None,
        }
    }

    /// Set the match type.
    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    /// Set the fuzziness.
    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = Some(fuzziness);
        self
    }

    /// Target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Values to match; a document matches if any of them matches.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Match type.
    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// Fuzziness, if enabled.
    pub fn fuzziness(&self) -> Option<Fuzziness> {
        self.fuzziness
    }

    /// Text of each value; every one is matched as a separate phrase.
    pub fn phrases(&self) -> Vec<String> {
        self.values.iter().filter_map(value_to_text).collect()
    }

    /// Render one phrase per value, OR-ed together when there are several.
    pub(crate) fn to_json(&self) -> Value {
        let mut clauses: Vec<Value> = self
            .phrases()
            .iter()
            .map(|phrase| self.phrase_json(phrase))
            .collect();

        match clauses.len() {
            1 => clauses.remove(0),
            _ => json!({
                "bool": {
                    "should": clauses,
                    "minimum_should_match": 1,
                }
            }),
        }
    }

    fn phrase_json(&self, phrase: &str) -> Value {
        let Some(fuzziness) = self.fuzziness else {
            let kind = match self.match_type {
                MatchType::Phrase => "match_phrase",
                MatchType::PhrasePrefix => "match_phrase_prefix",
            };
            return keyed(kind, keyed(&self.field, json!({ "query": phrase })));
        };

        // Phrase queries take no fuzziness: spell the phrase out as adjacent
        // fuzzy spans, the last one a prefix span for phrase-prefix matching.
        let terms = Analyzer::exact().analyze(phrase);
        let last = terms.len().saturating_sub(1);
        let spans: Vec<Value> = terms
            .iter()
            .enumerate()
            .map(|(i, term)| {
                let inner = if i == last && self.match_type == MatchType::PhrasePrefix {
                    keyed("prefix", keyed(&self.field, json!({ "value": term.text })))
                } else {
                    keyed(
                        "fuzzy",
                        keyed(
                            &self.field,
                            json!({ "value": term.text, "fuzziness": fuzziness.to_json() }),
                        ),
                    )
                };
                json!({ "span_multi": { "match": inner } })
            })
            .collect();

        json!({
            "span_near": {
                "clauses": spans,
                "slop": 0,
                "in_order": true,
            }
        })
    }
}

/// Full-text match of a single value against several fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchQuery {
    fields: Vec<String>,
    query: String,
    match_type: MultiMatchType,
    fuzziness: Option<Fuzziness>,
    tie_breaker: Option<f32>,
    operator: Option<Operator>,
}

impl MultiMatchQuery {
    /// Create a phrase multi-match query.
    pub fn new<S: Into<String>>(fields: Vec<String>, query: S) -> Self {
        MultiMatchQuery {
            fields,
            query: query.into(),
            match_type: MultiMatchType::default(),
            fuzziness: None,
            tie_breaker: None,
            operator: None,
        }
    }

    /// Set the match type.
    pub fn with_match_type(mut self, match_type: MultiMatchType) -> Self {
        self.match_type = match_type;
        self
    }

    /// Set the fuzziness.
    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = Some(fuzziness);
        self
    }

    /// Set the tie breaker.
    pub fn with_tie_breaker(mut self, tie_breaker: f32) -> Self {
        self.tie_breaker = Some(tie_breaker);
        self
    }

    /// Set the operator.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Target fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Match type.
    pub fn match_type(&self) -> MultiMatchType {
        self.match_type
    }

    /// Fuzziness, if enabled.
    pub fn fuzziness(&self) -> Option<Fuzziness> {
        self.fuzziness
    }

    /// Tie breaker, if set.
    pub fn tie_breaker(&self) -> Option<f32> {
        self.tie_breaker
    }

    /// Operator, if set.
    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut params = json!({
            "query": self.query,
            "fields": self.fields,
            "type": self.match_type.as_str(),
        });
        if let Some(fuzziness) = self.fuzziness {
            params["fuzziness"] = fuzziness.to_json();
        }
        if let Some(tie_breaker) = self.tie_breaker {
            params["tie_breaker"] = json!(tie_breaker);
        }
        if let Some(operator) = self.operator {
            params["operator"] = json!(operator.as_str());
        }
        json!({ "multi_match": params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_renders_phrase() {
        let query = MatchQuery::new("title", vec![json!("Programming Rust")]);
        assert_eq!(
            query.to_json(),
            json!({"match_phrase": {"title": {"query": "Programming Rust"}}})
        );

        let query = query.with_match_type(MatchType::PhrasePrefix);
        assert_eq!(
            query.to_json(),
            json!({"match_phrase_prefix": {"title": {"query": "Programming Rust"}}})
        );
    }

    #[test]
    fn test_each_value_is_its_own_phrase() {
        let query = MatchQuery::new("title", vec![json!("rust"), json!("book")]);

        assert_eq!(
            query.to_json(),
            json!({"bool": {
                "should": [
                    {"match_phrase": {"title": {"query": "rust"}}},
                    {"match_phrase": {"title": {"query": "book"}}}
                ],
                "minimum_should_match": 1
            }})
        );
    }

    #[test]
    fn test_fuzzy_phrase_renders_adjacent_spans() {
        let query =
            MatchQuery::new("title", vec![json!("Rust Book")]).with_fuzziness(Fuzziness::Auto);

        let span = |term: &str| {
            json!({"span_multi": {"match": {
                "fuzzy": {"title": {"value": term, "fuzziness": "AUTO"}}
            }}})
        };
        assert_eq!(
            query.to_json(),
            json!({"span_near": {
                "clauses": [span("rust"), span("book")],
                "slop": 0,
                "in_order": true
            }})
        );
    }

    #[test]
    fn test_multi_match_query_json_skips_unset_parameters() {
        let query = MultiMatchQuery::new(vec!["title".into(), "body".into()], "rust");
        let json = query.to_json();

        assert_eq!(json["multi_match"]["type"], "phrase");
        assert!(json["multi_match"].get("tie_breaker").is_none());
        assert!(json["multi_match"].get("operator").is_none());
    }

    #[test]
    fn test_multi_match_options_default() {
        let options = MultiMatchOptions::default();
        assert_eq!(options.match_type, MultiMatchType::Phrase);
        assert_eq!(options.tie_breaker, 0.0);
        assert_eq!(options.operator, Operator::And);
        assert!(!options.fuzzy);
    }
}
