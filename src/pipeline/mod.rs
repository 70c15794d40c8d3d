//! Pipeline entry points for crawler operations.
//!
//! - `run_top_words`: Fetch the inputs, crawl every article and rank the words

pub mod top_words;

pub use top_words::run_top_words;
