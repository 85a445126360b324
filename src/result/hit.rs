//! A single decorated hit.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::document::Attributes;
use crate::result::value::ResultValue;

/// Read-only, key-addressable view over one hit's attributes.
///
/// Nested mappings are converted into nested `SearchResult`s once, when the
/// result is built. Looking up an unknown key yields
/// [`ResultValue::Null`], never an error.
///
/// # Examples
///
/// ```
/// use searchlight::document::attributes;
/// use searchlight::result::SearchResult;
/// use serde_json::json;
///
/// let result = SearchResult::new(attributes(json!({"a": 1, "b": {"c": 2}})));
/// assert_eq!(result.get("a").as_integer(), Some(1));
/// assert_eq!(result.get("b").get("c").as_integer(), Some(2));
/// assert!(result.get("z").is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    id: Option<String>,
    category: Option<String>,
    score: Option<f32>,
    attributes: BTreeMap<String, ResultValue>,
}

impl SearchResult {
    /// Decorate an attribute mapping.
    pub fn new(attributes: Attributes) -> Self {
        SearchResult {
            id: None,
            category: None,
            score: None,
            attributes: attributes
                .into_iter()
                .map(|(key, value)| (key, ResultValue::from(value)))
                .collect(),
        }
    }

    /// Decorate a backend hit, keeping its identity and score.
    pub fn from_hit<I, C>(id: I, category: C, score: f32, attributes: Attributes) -> Self
    where
        I: Into<String>,
        C: Into<String>,
    {
        SearchResult {
            id: Some(id.into()),
            category: Some(category.into()),
            score: Some(score),
            ..Self::new(attributes)
        }
    }

    /// Attribute value, or `Null` when absent.
    pub fn get(&self, key: &str) -> &ResultValue {
        static NULL: ResultValue = ResultValue::Null;
        self.attributes.get(key).unwrap_or(&NULL)
    }

    /// Whether the attribute exists (even if null).
    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Attribute names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// All attributes.
    pub fn attributes(&self) -> &BTreeMap<String, ResultValue> {
        &self.attributes
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the result has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Document identifier, for hits returned by a driver.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Category the hit belongs to, for hits returned by a driver.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Relevance score, for hits returned by a driver.
    pub fn score(&self) -> Option<f32> {
        self.score
    }

    /// Attributes as plain JSON.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl From<Attributes> for SearchResult {
    fn from(attributes: Attributes) -> Self {
        SearchResult::new(attributes)
    }
}
