// src/services/vocabulary.rs

//! Vocabulary filter.
//!
//! Decides which bank-of-words entries are countable and normalizes them.

use std::collections::HashSet;

/// Minimum character count of a countable word.
pub const MIN_WORD_LEN: usize = 3;

/// Predicate plus normalization for bank-of-words entries.
#[derive(Debug, Clone, Copy)]
pub struct VocabularyFilter {
    min_len: usize,
}

impl Default for VocabularyFilter {
    fn default() -> Self {
        Self::new(MIN_WORD_LEN)
    }
}

impl VocabularyFilter {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    /// A word is countable if it has at least `min_len` characters and
    /// every character is alphabetic.
    pub fn is_countable(&self, word: &str) -> bool {
        word.chars().count() >= self.min_len && word.chars().all(char::is_alphabetic)
    }

    /// Lower-cased form of a countable word, `None` otherwise.
    pub fn normalize(&self, word: &str) -> Option<String> {
        self.is_countable(word).then(|| word.to_lowercase())
    }

    /// Build the set of countable keys from a raw bank of words.
    ///
    /// Entries that normalize to the same key collapse into one.
    pub fn countable_set<I, S>(&self, bank_of_words: I) -> HashSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        bank_of_words
            .into_iter()
            .filter_map(|word| self.normalize(word.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_countable() {
        let filter = VocabularyFilter::default();
        let cases = [
            ("hello", true),
            ("Hello", true),
            ("HELLO", true),
            ("Hi", false),
            ("Hi1", false),
            ("hello1", false),
            ("hello there", false),
            ("a-b-c", false),
            ("1-1-1", false),
            ("A.A.A", false),
            ("its's", false),
            ("", false),
        ];
        for (word, expected) in cases {
            assert_eq!(filter.is_countable(word), expected, "word: {word:?}");
        }
    }

    #[test]
    fn test_length_counts_characters() {
        let filter = VocabularyFilter::default();
        assert!(filter.is_countable("été"));
        assert!(!filter.is_countable("éé"));
    }

    #[test]
    fn test_normalize_lowercases() {
        let filter = VocabularyFilter::default();
        assert_eq!(filter.normalize("Hello"), Some("hello".to_string()));
        assert_eq!(filter.normalize("HELLO"), Some("hello".to_string()));
        assert_eq!(filter.normalize("a-b-c"), None);
    }

    #[test]
    fn test_countable_set_collapses_duplicates() {
        let filter = VocabularyFilter::default();
        let set = filter.countable_set(["Hello", "HELLO", "hello", "a", "security", "x1y"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("hello"));
        assert!(set.contains("security"));
        assert!(set.iter().all(|k| k.chars().all(|c| !c.is_uppercase())));
    }

    #[test]
    fn test_custom_min_len() {
        let filter = VocabularyFilter::new(5);
        assert!(!filter.is_countable("good"));
        assert!(filter.is_countable("hello"));
    }
}
