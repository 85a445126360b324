//! Attribute values of a search result.

use serde_json::{Number, Value};

use crate::result::hit::SearchResult;

static NULL: ResultValue = ResultValue::Null;

/// A decorated attribute value.
///
/// Nested JSON objects become [`ResultValue::Nested`] results when the
/// value is built, so nested lookups never re-wrap anything.
///
/// # Examples
///
/// ```
/// use searchlight::result::ResultValue;
/// use serde_json::json;
///
/// let value = ResultValue::from(json!({"c": {"d": 2}}));
/// assert_eq!(value.get("c").get("d").as_integer(), Some(2));
/// assert!(value.get("missing").get("deeper").is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultValue {
    /// Absent or null value.
    #[default]
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// List of values.
    List(Vec<ResultValue>),
    /// Nested attribute mapping.
    Nested(SearchResult),
}

impl ResultValue {
    /// Look up a key of a nested value; anything else yields `Null`.
    pub fn get(&self, key: &str) -> &ResultValue {
        match self {
            ResultValue::Nested(result) => result.get(key),
            _ => &NULL,
        }
    }

    /// Whether the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, ResultValue::Null)
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResultValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer content, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ResultValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric content as a float (integers are widened).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ResultValue::Float(value) => Some(*value),
            ResultValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ResultValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// List content, if this is a list.
    pub fn as_list(&self) -> Option<&[ResultValue]> {
        match self {
            ResultValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Nested result, if this is a nested mapping.
    pub fn as_nested(&self) -> Option<&SearchResult> {
        match self {
            ResultValue::Nested(result) => Some(result),
            _ => None,
        }
    }

    /// Convert back into plain JSON.
    pub fn to_json(&self) -> Value {
        match self {
            ResultValue::Null => Value::Null,
            ResultValue::Boolean(value) => Value::Bool(*value),
            ResultValue::Integer(value) => Value::from(*value),
            ResultValue::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ResultValue::Text(text) => Value::String(text.clone()),
            ResultValue::List(values) => Value::Array(values.iter().map(Self::to_json).collect()),
            ResultValue::Nested(result) => result.to_json(),
        }
    }
}

impl From<Value> for ResultValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ResultValue::Null,
            Value::Bool(flag) => ResultValue::Boolean(flag),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => ResultValue::Integer(integer),
                None => ResultValue::Float(number.as_f64().unwrap_or_default()),
            },
            Value::String(text) => ResultValue::Text(text),
            Value::Array(values) => {
                ResultValue::List(values.into_iter().map(ResultValue::from).collect())
            }
            Value::Object(map) => ResultValue::Nested(SearchResult::new(map)),
        }
    }
}

impl PartialEq<i64> for ResultValue {
    fn eq(&self, other: &i64) -> bool {
        self.as_integer() == Some(*other)
    }
}

impl PartialEq<f64> for ResultValue {
    fn eq(&self, other: &f64) -> bool {
        self.as_float() == Some(*other)
    }
}

impl PartialEq<bool> for ResultValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_boolean() == Some(*other)
    }
}

impl PartialEq<str> for ResultValue {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for ResultValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}
