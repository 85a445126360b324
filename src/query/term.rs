//! Exact-value queries: term, terms and prefix.

use serde_json::{Value, json};

use crate::query::keyed;

/// Exact match of a field against a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    field: String,
    value: Value,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new<S: Into<String>, V: Into<Value>>(field: S, value: V) -> Self {
        TermQuery {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Expected value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn to_json(&self) -> Value {
        keyed("term", keyed(&self.field, self.value.clone()))
    }
}

/// Exact match of a field against any value of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    field: String,
    values: Vec<Value>,
}

impl TermsQuery {
    /// Create a new terms query.
    pub fn new<S: Into<String>>(field: S, values: Vec<Value>) -> Self {
        TermsQuery {
            field: field.into(),
            values,
        }
    }

    /// Target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Accepted values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub(crate) fn to_json(&self) -> Value {
        keyed("terms", keyed(&self.field, json!(self.values)))
    }
}

/// Match of a field whose value, or one of its terms, starts with any of the prefixes.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixQuery {
    field: String,
    prefixes: Vec<String>,
}

impl PrefixQuery {
    /// Create a new prefix query.
    pub fn new<S: Into<String>>(field: S, prefixes: Vec<String>) -> Self {
        PrefixQuery {
            field: field.into(),
            prefixes,
        }
    }

    /// Target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Accepted prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub(crate) fn to_json(&self) -> Value {
        match self.prefixes.as_slice() {
            [single] => keyed("prefix", keyed(&self.field, json!(single))),
            many => json!({
                "bool": {
                    "should": many
                        .iter()
                        .map(|prefix| keyed("prefix", keyed(&self.field, json!(prefix))))
                        .collect::<Vec<_>>(),
                    "minimum_should_match": 1,
                }
            }),
        }
    }
}
