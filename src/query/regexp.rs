//! Regular expression query.

use std::sync::Arc;

use regex::Regex;
use serde_json::{Value, json};

use crate::error::{Result, SearchlightError};
use crate::query::keyed;

/// Matches documents whose field value, or one of its terms, matches the
/// whole pattern.
#[derive(Debug, Clone)]
pub struct RegexpQuery {
    field: String,
    pattern: String,
    regex: Arc<Regex>,
}

impl RegexpQuery {
    /// Create a regexp query; the pattern is validated here.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, pattern: P) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| SearchlightError::query(format!("Invalid regexp pattern: {e}")))?;

        Ok(RegexpQuery {
            field: field.into(),
            pattern,
            regex: Arc::new(regex),
        })
    }

    /// Target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Pattern as given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check a term against the anchored pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }

    pub(crate) fn to_json(&self) -> Value {
        keyed("regexp", keyed(&self.field, json!(self.pattern)))
    }
}

impl PartialEq for RegexpQuery {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.pattern == other.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regexp_is_anchored() {
        let query = RegexpQuery::new("sku", "ab[0-9]+").unwrap();
        assert!(query.matches("ab123"));
        assert!(!query.matches("xab123"));
        assert!(!query.matches("ab123x"));
    }

    #[test]
    fn test_invalid_regexp() {
        let error = RegexpQuery::new("sku", "ab[").unwrap_err();
        assert!(error.is_validation());
    }
}
