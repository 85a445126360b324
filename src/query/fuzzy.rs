//! Fuzzy query implementation for approximate term matching.

use std::fmt;

use serde_json::{Value, json};

use crate::query::keyed;

/// Allowed edit distance for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fuzziness {
    /// Distance derived from the term length: 0 edits for 1-2 characters,
    /// 1 edit for 3-5 characters, 2 edits beyond that.
    #[default]
    Auto,
    /// Fixed number of edits.
    Edits(u8),
}

impl Fuzziness {
    /// Maximum number of edits allowed for a term of the given length.
    pub fn max_edits(&self, term_length: usize) -> usize {
        match self {
            Fuzziness::Auto => match term_length {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
            Fuzziness::Edits(edits) => usize::from(*edits),
        }
    }

    pub(crate) fn to_json(self) -> Value {
        match self {
            Fuzziness::Auto => json!("AUTO"),
            Fuzziness::Edits(edits) => json!(edits),
        }
    }
}

impl fmt::Display for Fuzziness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fuzziness::Auto => f.write_str("AUTO"),
            Fuzziness::Edits(edits) => write!(f, "{edits}"),
        }
    }
}

/// Optional parameters of a fuzzy query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyOptions {
    /// Allowed edit distance.
    pub fuzziness: Fuzziness,
    /// Number of leading characters that must match exactly.
    pub prefix_length: u32,
    /// Maximum number of index terms the query expands to.
    pub max_expansions: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        FuzzyOptions {
            fuzziness: Fuzziness::Auto,
            prefix_length: 0,
            max_expansions: 50,
        }
    }
}

/// A fuzzy query for approximate term matching.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyQuery {
    field: String,
    value: String,
    fuzziness: Fuzziness,
    prefix_length: u32,
    max_expansions: usize,
}

impl FuzzyQuery {
    /// Create a new fuzzy query with default tuning (`AUTO`, 0, 50).
    pub fn new<F: Into<String>, T: Into<String>>(field: F, value: T) -> Self {
        Self::with_options(field, value, FuzzyOptions::default())
    }

    /// Create a fuzzy query with explicit tuning.
    pub fn with_options<F: Into<String>, T: Into<String>>(
        field: F,
        value: T,
        options: FuzzyOptions,
    ) -> Self {
        FuzzyQuery {
            field: field.into(),
            value: value.into(),
            fuzziness: options.fuzziness,
            prefix_length: options.prefix_length,
            max_expansions: options.max_expansions,
        }
    }

    /// Set the fuzziness.
    pub fn fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    /// Set the exact-match prefix length.
    pub fn prefix_length(mut self, prefix_length: u32) -> Self {
        self.prefix_length = prefix_length;
        self
    }

    /// Set the maximum number of term expansions.
    pub fn max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the search term.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the fuzziness.
    pub fn get_fuzziness(&self) -> Fuzziness {
        self.fuzziness
    }

    /// Get the prefix length.
    pub fn get_prefix_length(&self) -> u32 {
        self.prefix_length
    }

    /// Get the maximum number of term expansions.
    pub fn get_max_expansions(&self) -> usize {
        self.max_expansions
    }

    pub(crate) fn to_json(&self) -> Value {
        keyed(
            "fuzzy",
            keyed(
                &self.field,
                json!({
                    "value": self.value,
                    "fuzziness": self.fuzziness.to_json(),
                    "prefix_length": self.prefix_length,
                    "max_expansions": self.max_expansions,
                }),
            ),
        )
    }
}
