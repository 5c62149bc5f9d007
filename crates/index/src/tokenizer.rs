//! Default tokenizer
//!
//! Pipeline: UAX#29 word boundaries → remove non-alphanumeric → lowercase
//!           → filter short tokens → deduplicate

use quarry_core::Tokenizer;
use rustc_hash::FxHashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Word tokenizer producing each document's distinct lowercase tokens.
///
/// No stemming and no stopwords: every word that survives the length filter
/// is indexed.
///
/// # Example
///
/// ```
/// use quarry_core::Tokenizer;
/// use quarry_index::WordTokenizer;
///
/// let tokens = WordTokenizer::default().tokenize("Rust, rust and RUST's crates");
/// assert_eq!(tokens, vec!["rust", "and", "rusts", "crates"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordTokenizer {
    min_token_len: usize,
}

impl WordTokenizer {
    /// Keep tokens of at least `min_token_len` characters
    pub fn new(min_token_len: usize) -> Self {
        WordTokenizer { min_token_len }
    }

    /// Shortest token kept
    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        WordTokenizer::new(1)
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        text.unicode_words()
            .map(|w| {
                w.chars()
                    .filter(|c| c.is_alphanumeric())
                    .flat_map(char::to_lowercase)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty() && t.chars().count() >= self.min_token_len)
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }
}
