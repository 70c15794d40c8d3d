//! Service layer for the word crawler.
//!
//! This module contains the business logic for:
//! - Vocabulary filtering (`VocabularyFilter`)
//! - Concurrent word tallying and top-K extraction (`WordCounter`)
//! - Shared outbound rate limiting (`RateLimiter`)
//! - Per-article fetch with throttle backoff (`ArticleFetcher`)
//! - Content extraction (`ContentExtractor`)
//! - The worker pool (`Dispatcher`)
//! - The end-to-end top words service (`WordCounterService`)

mod counter;
mod dispatcher;
mod extract;
mod limiter;
mod retry;
mod vocabulary;
mod word_counter;

pub use counter::WordCounter;
pub use dispatcher::{DispatchSettings, Dispatcher};
pub use extract::ContentExtractor;
pub use limiter::RateLimiter;
pub use retry::{ArticleFetcher, FetchOutcome, FetchState, RetryPolicy};
pub use vocabulary::{MIN_WORD_LEN, VocabularyFilter};
pub use word_counter::{TopWordsReport, WordCounterService};
