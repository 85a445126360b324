//! Range query implementation for querying within value ranges.

use std::cmp::Ordering;

use serde_json::{Map, Value, json};

use crate::error::{Result, SearchlightError};
use crate::query::keyed;

/// Bound type for range queries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Bound<T> {
    /// Inclusive bound (`gte` / `lte`).
    Included(T),
    /// Exclusive bound (`gt` / `lt`).
    Excluded(T),
    /// No limit.
    #[default]
    Unbounded,
}

impl<T> Bound<T> {
    /// Whether this side of the range is open.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    /// The bound value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Bound::Included(value) | Bound::Excluded(value) => Some(value),
            Bound::Unbounded => None,
        }
    }

    /// Check a candidate against this bound used as a lower bound.
    ///
    /// `compare` orders the candidate relative to the bound value; `None`
    /// means the two are not comparable and the candidate is rejected.
    pub fn accepts_lower<F>(&self, compare: F) -> bool
    where
        F: Fn(&T) -> Option<Ordering>,
    {
        match self {
            Bound::Included(bound) => matches!(
                compare(bound),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            Bound::Excluded(bound) => matches!(compare(bound), Some(Ordering::Greater)),
            Bound::Unbounded => true,
        }
    }

    /// Check a candidate against this bound used as an upper bound.
    pub fn accepts_upper<F>(&self, compare: F) -> bool
    where
        F: Fn(&T) -> Option<Ordering>,
    {
        match self {
            Bound::Included(bound) => {
                matches!(compare(bound), Some(Ordering::Less) | Some(Ordering::Equal))
            }
            Bound::Excluded(bound) => matches!(compare(bound), Some(Ordering::Less)),
            Bound::Unbounded => true,
        }
    }
}

/// Lower and upper bounds of a range query.
///
/// # Examples
///
/// ```
/// use searchlight::query::range::Bounds;
/// use serde_json::json;
///
/// let bounds = Bounds::new().gte(1).lt(10);
/// assert!(!bounds.is_empty());
///
/// assert!(Bounds::from_json(&json!({})).is_err());
/// assert!(Bounds::from_json(&json!({"gte": 1})).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bounds {
    lower: Bound<Value>,
    upper: Bound<Value>,
}

impl Bounds {
    /// Unbounded on both sides; add at least one bound before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive lower bound.
    pub fn gt<V: Into<Value>>(mut self, value: V) -> Self {
        self.lower = Bound::Excluded(value.into());
        self
    }

    /// Inclusive lower bound.
    pub fn gte<V: Into<Value>>(mut self, value: V) -> Self {
        self.lower = Bound::Included(value.into());
        self
    }

    /// Exclusive upper bound.
    pub fn lt<V: Into<Value>>(mut self, value: V) -> Self {
        self.upper = Bound::Excluded(value.into());
        self
    }

    /// Inclusive upper bound.
    pub fn lte<V: Into<Value>>(mut self, value: V) -> Self {
        self.upper = Bound::Included(value.into());
        self
    }

    /// Parse bounds from a `{gt, gte, lt, lte}` mapping.
    ///
    /// Unknown keys, or both `gt` and `gte` (or `lt` and `lte`), are
    /// rejected. An empty mapping is rejected as well.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SearchlightError::invalid_range("bounds must be a mapping"))?;
        let bounds = Self::from_map(map)?;
        if bounds.is_empty() {
            return Err(SearchlightError::invalid_range(
                "at least one of gt, gte, lt or lte is required",
            ));
        }
        Ok(bounds)
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut bounds = Bounds::new();
        for (key, value) in map {
            let side_taken = match key.as_str() {
                "gt" | "gte" => !bounds.lower.is_unbounded(),
                "lt" | "lte" => !bounds.upper.is_unbounded(),
                other => {
                    return Err(SearchlightError::invalid_range(format!(
                        "unsupported bound key '{other}'"
                    )));
                }
            };
            if side_taken {
                return Err(SearchlightError::invalid_range(format!(
                    "conflicting bound '{key}'"
                )));
            }
            bounds = match key.as_str() {
                "gt" => bounds.gt(value.clone()),
                "gte" => bounds.gte(value.clone()),
                "lt" => bounds.lt(value.clone()),
                _ => bounds.lte(value.clone()),
            };
        }
        Ok(bounds)
    }

    /// Whether neither side is bounded.
    pub fn is_empty(&self) -> bool {
        self.lower.is_unbounded() && self.upper.is_unbounded()
    }

    /// Lower bound.
    pub fn lower(&self) -> &Bound<Value> {
        &self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> &Bound<Value> {
        &self.upper
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match &self.lower {
            Bound::Included(value) => {
                map.insert("gte".to_string(), value.clone());
            }
            Bound::Excluded(value) => {
                map.insert("gt".to_string(), value.clone());
            }
            Bound::Unbounded => {}
        }
        match &self.upper {
            Bound::Included(value) => {
                map.insert("lte".to_string(), value.clone());
            }
            Bound::Excluded(value) => {
                map.insert("lt".to_string(), value.clone());
            }
            Bound::Unbounded => {}
        }
        map
    }
}

/// Optional parameters of a range query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Offset applied to date values without one (`+01:00`, `Z`, `UTC`).
    pub time_zone: Option<String>,
    /// Date format of the bound and field values (strftime syntax).
    pub format: Option<String>,
}

/// A query that matches documents with field values within a range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    field: String,
    bounds: Bounds,
    time_zone: Option<String>,
    format: Option<String>,
}

impl RangeQuery {
    /// Create a range query; fails with `InvalidRange` when `bounds` is empty.
    pub fn new<S: Into<String>>(field: S, bounds: Bounds) -> Result<Self> {
        let field = field.into();
        if bounds.is_empty() {
            return Err(SearchlightError::invalid_range(format!(
                "range on '{field}' needs at least one of gt, gte, lt or lte"
            )));
        }

        Ok(RangeQuery {
            field,
            bounds,
            time_zone: None,
            format: None,
        })
    }

    /// Set the time zone.
    pub fn with_time_zone<S: Into<String>>(mut self, time_zone: S) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Set the date format.
    pub fn with_format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Bounds.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Time zone, if set.
    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    /// Date format, if set.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut params = self.bounds.to_json();
        if let Some(time_zone) = &self.time_zone {
            params.insert("time_zone".to_string(), json!(time_zone));
        }
        if let Some(format) = &self.format {
            params.insert("format".to_string(), json!(format));
        }
        keyed("range", keyed(&self.field, Value::Object(params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_requires_a_bound() {
        let error = RangeQuery::new("age", Bounds::new()).unwrap_err();
        assert!(matches!(error, SearchlightError::InvalidRange(_)));

        assert!(RangeQuery::new("age", Bounds::new().gte(1)).is_ok());
        assert!(RangeQuery::new("age", Bounds::new().lt(1)).is_ok());
    }

    #[test]
    fn test_bounds_from_json() {
        let bounds = Bounds::from_json(&json!({"gt": 1, "lte": 5})).unwrap();
        assert_eq!(bounds.lower(), &Bound::Excluded(json!(1)));
        assert_eq!(bounds.upper(), &Bound::Included(json!(5)));

        assert!(Bounds::from_json(&json!({})).is_err());
        assert!(Bounds::from_json(&json!({"from": 1})).is_err());
        assert!(Bounds::from_json(&json!({"gt": 1, "gte": 2})).is_err());
        assert!(Bounds::from_json(&json!([1])).is_err());
    }

    #[test]
    fn test_bound_checks() {
        let compare = |candidate: i64| move |bound: &i64| Some(candidate.cmp(bound));

        assert!(Bound::Included(5).accepts_lower(compare(5)));
        assert!(!Bound::Excluded(5).accepts_lower(compare(5)));
        assert!(Bound::Excluded(5).accepts_upper(compare(4)));
        assert!(Bound::<i64>::Unbounded.accepts_upper(compare(100)));
        assert!(!Bound::Included(5).accepts_lower(|_: &i64| None));
    }

    #[test]
    fn test_range_json() {
        let query = RangeQuery::new("published", Bounds::new().gte("2020-01-01"))
            .unwrap()
            .with_time_zone("+01:00");

        assert_eq!(
            query.to_json(),
            json!({"range": {"published": {"gte": "2020-01-01", "time_zone": "+01:00"}}})
        );
    }
}
