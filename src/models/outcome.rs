// src/models/outcome.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of a crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub article_total: usize,
    /// Articles fetched with a 200 response and counted
    pub fetched: usize,
    /// Articles dropped after a transport error or non-OK status
    pub abandoned: usize,
    /// Throttle responses absorbed by backoff across all articles
    pub throttle_retries: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    pub fn processed(&self) -> usize {
        self.fetched + self.abandoned
    }

    /// Fraction of articles that were counted, 1.0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.article_total == 0 {
            return 1.0;
        }
        self.fetched as f64 / self.article_total as f64
    }
}
