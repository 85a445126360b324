//! Text analysis for the in-memory driver.
//!
//! Text is split on Unicode word boundaries (UAX #29), lowercased, and
//! stemmed. Each [`Token`] keeps both its lowercased surface form (used by
//! prefix, wildcard, regexp and fuzzy matching) and its stem (used by
//! match and phrase matching).

pub mod stemmer;

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

pub use self::stemmer::{IdentityStemmer, SimpleStemmer, Stemmer};

/// A single analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lowercased surface form.
    pub text: String,
    /// Stemmed form.
    pub stem: String,
    /// Position in the token stream.
    pub position: usize,
}

/// Tokenizer plus stemmer.
#[derive(Debug, Clone)]
pub struct Analyzer {
    stemmer: Arc<dyn Stemmer>,
}

impl Analyzer {
    /// Analyzer with the given stemmer.
    pub fn new(stemmer: Arc<dyn Stemmer>) -> Self {
        Analyzer { stemmer }
    }

    /// Default analyzer: word tokenization, lowercasing, simple English stemming.
    pub fn standard() -> Self {
        Self::new(Arc::new(SimpleStemmer::new()))
    }

    /// Analyzer without stemming.
    pub fn exact() -> Self {
        Self::new(Arc::new(IdentityStemmer))
    }

    /// Name of the configured stemmer.
    pub fn stemmer_name(&self) -> &'static str {
        self.stemmer.name()
    }

    /// Analyze a piece of text into tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use searchlight::analysis::Analyzer;
    ///
    /// let tokens = Analyzer::standard().analyze("Testing, the Books!");
    /// let stems: Vec<_> = tokens.iter().map(|t| t.stem.as_str()).collect();
    /// assert_eq!(stems, vec!["test", "the", "book"]);
    /// ```
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        text.unicode_words()
            .enumerate()
            .map(|(position, word)| {
                let text = word.to_lowercase();
                let stem = self.stemmer.stem(&text);
                Token {
                    text,
                    stem,
                    position,
                }
            })
            .collect()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_analyzer() {
        let tokens = Analyzer::standard().analyze("Hello, World! Running tests");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world", "running", "tests"]);
        assert_eq!(tokens[3].stem, "test");
        assert_eq!(tokens[3].position, 3);
    }

    #[test]
    fn test_exact_analyzer() {
        let tokens = Analyzer::exact().analyze("Testing");
        assert_eq!(tokens[0].stem, "testing");
        assert_eq!(Analyzer::exact().stemmer_name(), "identity");
    }

    #[test]
    fn test_empty_text() {
        assert!(Analyzer::standard().analyze("  ,;  ").is_empty());
    }
}
