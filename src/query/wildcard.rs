//! Wildcard query implementation for pattern matching.

use std::sync::Arc;

use regex::Regex;
use serde_json::{Value, json};

use crate::error::{Result, SearchlightError};
use crate::query::keyed;

/// Optional parameters of a wildcard query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WildcardOptions {
    /// Score multiplier.
    pub boost: f32,
}

impl Default for WildcardOptions {
    fn default() -> Self {
        WildcardOptions { boost: 1.0 }
    }
}

/// A query that matches documents containing terms that match a wildcard pattern.
///
/// Supports the following wildcards:
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
/// - `\*` and `\?` match literal `*` and `?` characters
#[derive(Debug, Clone)]
pub struct WildcardQuery {
    field: String,
    pattern: String,
    regex: Arc<Regex>,
    boost: f32,
}

impl WildcardQuery {
    /// Create a new wildcard query.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, pattern: P) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Self::compile_pattern(&pattern)?;

        Ok(WildcardQuery {
            field: field.into(),
            pattern,
            regex: Arc::new(regex),
            boost: 1.0,
        })
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Check if a term matches the wildcard pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }

    /// Translate a wildcard pattern into an anchored regex.
    fn compile_pattern(pattern: &str) -> Result<Regex> {
        let mut regex_pattern = String::with_capacity(pattern.len() + 8);
        regex_pattern.push('^');

        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => regex_pattern.push_str(&regex::escape(&escaped.to_string())),
                    None => regex_pattern.push_str("\\\\"),
                },
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                other => regex_pattern.push_str(&regex::escape(&other.to_string())),
            }
        }

        regex_pattern.push('$');

        Regex::new(&regex_pattern)
            .map_err(|e| SearchlightError::query(format!("Invalid wildcard pattern: {e}")))
    }

    pub(crate) fn to_json(&self) -> Value {
        keyed(
            "wildcard",
            keyed(
                &self.field,
                json!({ "value": self.pattern, "boost": self.boost }),
            ),
        )
    }
}

impl PartialEq for WildcardQuery {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.pattern == other.pattern && self.boost == other.boost
    }
}
