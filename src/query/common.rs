//! Common-terms query.
//!
//! Terms are split into low-frequency and high-frequency groups using the
//! cutoff frequency (a fraction of the searched documents). Low-frequency
//! terms decide whether a document matches; high-frequency terms only add
//! to the score, unless every query term is high-frequency.

use serde_json::{Value, json};

use crate::query::keyed;

/// Optional parameters of a common-terms query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommonOptions {
    /// Document frequency ratio above which a term counts as common.
    pub cutoff_frequency: f64,
    /// Minimum number of low-frequency terms that must match.
    pub minimum_should_match: Option<usize>,
}

impl Default for CommonOptions {
    fn default() -> Self {
        CommonOptions {
            cutoff_frequency: 0.001,
            minimum_should_match: None,
        }
    }
}

/// Common-terms query against a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTermsQuery {
    field: String,
    query: String,
    cutoff_frequency: f64,
    minimum_should_match: Option<usize>,
}

impl CommonTermsQuery {
    /// Create a common-terms query with the default cutoff (0.001).
    pub fn new<F: Into<String>, Q: Into<String>>(field: F, query: Q) -> Self {
        Self::with_options(field, query, CommonOptions::default())
    }

    /// Create a common-terms query with explicit options.
    pub fn with_options<F: Into<String>, Q: Into<String>>(
        field: F,
        query: Q,
        options: CommonOptions,
    ) -> Self {
        CommonTermsQuery {
            field: field.into(),
            query: query.into(),
            cutoff_frequency: options.cutoff_frequency,
            minimum_should_match: options.minimum_should_match,
        }
    }

    /// Set the cutoff frequency.
    pub fn cutoff_frequency(mut self, cutoff_frequency: f64) -> Self {
        self.cutoff_frequency = cutoff_frequency;
        self
    }

    /// Set the minimum number of low-frequency terms that must match.
    pub fn minimum_should_match(mut self, minimum: usize) -> Self {
        self.minimum_should_match = Some(minimum);
        self
    }

    /// Target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Cutoff frequency.
    pub fn get_cutoff_frequency(&self) -> f64 {
        self.cutoff_frequency
    }

    /// Minimum should match, if set.
    pub fn get_minimum_should_match(&self) -> Option<usize> {
        self.minimum_should_match
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut params = json!({
            "query": self.query,
            "cutoff_frequency": self.cutoff_frequency,
        });
        if let Some(minimum) = self.minimum_should_match {
            params["minimum_should_match"] = json!(minimum);
        }
        keyed("common", keyed(&self.field, params))
    }
}
