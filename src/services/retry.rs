// src/services/retry.rs

//! Per-article fetch with throttle backoff.
//!
//! Each fetch walks a small state machine:
//!
//! ```text
//! Attempting ──throttled──▶ Backoff ──slept──▶ Attempting
//!     │
//!     ├──200──────────────▶ Done
//!     └──other failure────▶ Abandoned
//! ```
//!
//! Only the configured throttle status is retried, and it is retried
//! without limit. Everything else fails fast so that one broken article
//! never holds up a worker.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::services::RateLimiter;
use crate::utils::http::{FetchResponse, HttpFetcher};

/// Decides what happens after each attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub throttle_status: u16,
    /// Sleep after the first throttle response for an article
    pub long_backoff: Duration,
    /// Sleep after every later throttle response for the same article
    pub short_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            throttle_status: config.throttle_status,
            long_backoff: config.long_backoff(),
            short_backoff: config.short_backoff(),
        }
    }

    /// Backoff for an article that has already been throttled `previous` times.
    pub fn backoff(&self, previous: u32) -> Duration {
        if previous == 0 {
            self.long_backoff
        } else {
            self.short_backoff
        }
    }

    /// State that follows an attempt's result.
    pub fn next_state(
        &self,
        url: &str,
        result: Result<FetchResponse>,
        previous_throttles: u32,
    ) -> FetchState {
        match result {
            Ok(response) if response.status == self.throttle_status => {
                FetchState::Backoff(self.backoff(previous_throttles))
            }
            Ok(response) if response.is_ok() => FetchState::Done(response.body),
            Ok(response) => FetchState::Abandoned(AppError::Status {
                url: url.to_string(),
                status: response.status,
            }),
            Err(error) => FetchState::Abandoned(error),
        }
    }
}

/// States of a single article fetch.
#[derive(Debug)]
pub enum FetchState {
    Attempting,
    Backoff(Duration),
    Done(String),
    Abandoned(AppError),
}

/// Terminal result of a fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched { body: String, throttled: u32 },
    Abandoned { error: AppError, throttled: u32 },
}

impl FetchOutcome {
    pub fn throttled(&self) -> u32 {
        match self {
            Self::Fetched { throttled, .. } | Self::Abandoned { throttled, .. } => *throttled,
        }
    }
}

/// Rate-limited fetcher that applies a `RetryPolicy` to every request.
#[derive(Clone)]
pub struct ArticleFetcher {
    http: Arc<dyn HttpFetcher>,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl ArticleFetcher {
    pub fn new(http: Arc<dyn HttpFetcher>, limiter: Arc<RateLimiter>, policy: RetryPolicy) -> Self {
        Self {
            http,
            limiter,
            policy,
        }
    }

    /// Fetch one article, sleeping through throttle responses.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let mut throttled = 0u32;
        let mut state = FetchState::Attempting;

        loop {
            state = match state {
                FetchState::Attempting => {
                    self.limiter.acquire().await;
                    let result = self.http.get(url).await;
                    self.policy.next_state(url, result, throttled)
                }
                FetchState::Backoff(delay) => {
                    throttled += 1;
                    log::warn!(
                        "Throttled by {}: sleeping for {:?} (attempt {})",
                        url,
                        delay,
                        throttled
                    );
                    tokio::time::sleep(delay).await;
                    FetchState::Attempting
                }
                FetchState::Done(body) => return FetchOutcome::Fetched { body, throttled },
                FetchState::Abandoned(error) => {
                    log::warn!("Failed to fetch {}: {}", url, error);
                    return FetchOutcome::Abandoned { error, throttled };
                }
            };
        }
    }
}
