// src/services/counter.rs

//! Concurrent word tally with top-K extraction.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;

use crate::models::WordCount;

/// Maximal runs of alphabetic characters.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Alphabetic}+").expect("word pattern is valid"));

/// Fixed-key word tally, safe to share between workers.
///
/// Keys are fixed at construction; only their counts change afterwards.
/// Each key owns an atomic counter, so concurrent increments never lose
/// updates and never contend on a shared lock.
#[derive(Debug, Default)]
pub struct WordCounter {
    counts: HashMap<String, AtomicU64>,
}

impl WordCounter {
    /// Create a tally with every key at zero.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let counts = keys
            .into_iter()
            .map(|key| (key.into(), AtomicU64::new(0)))
            .collect();
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Current count for a key, `None` if the key is not tracked.
    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).map(|c| c.load(Ordering::Relaxed))
    }

    /// Count every tracked word in `text`, case-insensitively.
    ///
    /// Words absent from the tally are ignored.
    pub fn count_text(&self, text: &str) {
        if self.counts.is_empty() {
            return;
        }
        for word in WORD_RE.find_iter(text) {
            self.add_word(&word.as_str().to_lowercase());
        }
    }

    fn add_word(&self, key: &str) {
        if let Some(count) = self.counts.get(key) {
            count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Up to `n` words with a positive count, highest first.
    ///
    /// Equal counts are ordered by word. Call only after every
    /// `count_text` has returned.
    pub fn top_words(&self, n: usize) -> Vec<WordCount> {
        let mut pairs: Vec<WordCount> = self
            .counts
            .iter()
            .map(|(word, count)| WordCount::new(word.as_str(), count.load(Ordering::Relaxed)))
            .collect();

        pairs.sort_unstable_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.word.cmp(&b.word))
        });
        pairs.truncate(n);

        let last_non_zero = pairs
            .iter()
            .rposition(|pair| pair.amount > 0)
            .map_or(0, |i| i + 1);
        pairs.truncate(last_non_zero);
        pairs
    }
}
