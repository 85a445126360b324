//! Stemmers used by the in-memory analyzer.

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync + std::fmt::Debug {
    /// Stem a lowercased word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Stemmer that leaves words untouched.
#[derive(Debug, Clone, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Stemmer that strips common English suffixes.
///
/// Words of three characters or fewer are kept as is, and a suffix is only
/// removed when at least three characters of stem remain.
#[derive(Debug, Clone)]
pub struct SimpleStemmer {
    /// Suffixes, longest first.
    suffixes: Vec<String>,
}

impl SimpleStemmer {
    /// Create a stemmer with the default English suffix list.
    pub fn new() -> Self {
        Self::with_suffixes(
            [
                "ing", "ed", "er", "est", "ly", "s", "es", "ies", "ied", "tion", "sion", "ment",
                "ness",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }

    /// Create a stemmer with custom suffixes.
    pub fn with_suffixes(mut suffixes: Vec<String>) -> Self {
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        SimpleStemmer { suffixes }
    }
}

impl Default for SimpleStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stemmer for SimpleStemmer {
    fn stem(&self, word: &str) -> String {
        let length = word.chars().count();
        if length <= 3 {
            return word.to_string();
        }

        for suffix in &self.suffixes {
            if length > suffix.chars().count() + 2 && word.ends_with(suffix.as_str()) {
                return word[..word.len() - suffix.len()].to_string();
            }
        }

        word.to_string()
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}
