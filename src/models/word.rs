// src/models/word.rs

use serde::{Deserialize, Serialize};

/// A vocabulary word paired with the number of times it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub amount: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, amount: u64) -> Self {
        Self {
            word: word.into(),
            amount,
        }
    }
}

/// JSON envelope printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopWordsResponse {
    pub data: Vec<WordCount>,
}

/// The two input lists, one trimmed entry per source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactLists {
    pub articles: Vec<String>,
    pub bank_of_words: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_with_data_envelope() {
        let response = TopWordsResponse {
            data: vec![WordCount::new("the", 19), WordCount::new("security", 4)],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [
                    {"word": "the", "amount": 19},
                    {"word": "security", "amount": 4}
                ]
            })
        );
    }
}
