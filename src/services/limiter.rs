// src/services/limiter.rs

//! Shared outbound rate limiter.
//!
//! A token bucket with a configurable refill rate and a burst of one. Every
//! worker draws a token before each request, so the aggregate request rate
//! stays bounded no matter how many workers run.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{AppError, Result};

/// Delay used when no token can be granted.
pub const DEFAULT_FALLBACK: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

/// Token bucket shared by every worker.
#[derive(Debug)]
pub struct RateLimiter {
    /// Tokens added per second
    rate: f64,
    burst: f64,
    fallback: Duration,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Create a limiter allowing `rps` requests per second with a burst of one.
    pub fn new(rps: f64) -> Self {
        Self::with_fallback(rps, DEFAULT_FALLBACK)
    }

    pub fn with_fallback(rps: f64, fallback: Duration) -> Self {
        let burst = 1.0;
        Self {
            rate: rps,
            burst,
            fallback,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last: Instant::now(),
            }),
        }
    }

    /// Wait until a token is available.
    ///
    /// If the bucket cannot grant a token at all, the caller sleeps for the
    /// fallback delay and proceeds without one.
    pub async fn acquire(&self) {
        match self.reserve() {
            Ok(wait) if wait.is_zero() => {}
            Ok(wait) => tokio::time::sleep(wait).await,
            Err(e) => {
                log::warn!(
                    "Failed to acquire limiter token ({}). Sleeping for {:?}",
                    e,
                    self.fallback
                );
                tokio::time::sleep(self.fallback).await;
            }
        }
    }

    /// Take one token and return how long the caller must wait before using it.
    ///
    /// Tokens may go negative; the deficit is the queue of callers already
    /// waiting, which keeps grants evenly spaced at `1 / rate`.
    fn reserve(&self) -> Result<Duration> {
        if self.rate.is_infinite() && self.rate > 0.0 {
            return Ok(Duration::ZERO);
        }
        if self.rate.is_nan() || self.rate < 0.0 {
            return Err(AppError::limiter(format!("invalid rate {}", self.rate)));
        }

        let mut bucket = self
            .bucket
            .lock()
            .map_err(|_| AppError::limiter("token bucket lock poisoned"))?;

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.last).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst);
        bucket.last = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return Ok(Duration::ZERO);
        }
        if self.rate == 0.0 {
            return Err(AppError::limiter("rate is zero and the burst is spent"));
        }

        // A wait too long for `Duration` is treated like a spent bucket.
        let wait = Duration::try_from_secs_f64((1.0 - bucket.tokens) / self.rate)
            .map_err(|e| AppError::limiter(format!("rate {} too low: {}", self.rate, e)))?;
        bucket.tokens -= 1.0;
        Ok(wait)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_token_is_immediate() {
        let limiter = RateLimiter::new(2.0);
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_are_spaced_by_rate() {
        let limiter = RateLimiter::new(2.0);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        // First token is the burst, the remaining four arrive every 500ms.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(2100), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_between_tasks() {
        let limiter = Arc::new(RateLimiter::new(4.0));
        let start = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // Eight grants at 4/s with a burst of one need at least 7 * 250ms.
        assert!(start.elapsed() >= Duration::from_millis(1750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_does_not_accumulate_beyond_burst() {
        let limiter = RateLimiter::new(1.0);
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_rate_degrades_to_fallback_delay() {
        let limiter = RateLimiter::with_fallback(0.0, Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(2100), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_tiny_rate_degrades_to_fallback_delay() {
        let limiter = RateLimiter::with_fallback(1e-30, Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(2100), "{elapsed:?}");

        assert!(matches!(limiter.reserve(), Err(AppError::Limiter(_))));
    }

    #[tokio::test]
    async fn test_reserve_reports_failure_for_zero_rate() {
        let limiter = RateLimiter::new(0.0);
        assert!(limiter.reserve().is_ok());
        assert!(matches!(limiter.reserve(), Err(AppError::Limiter(_))));
    }

    #[tokio::test]
    async fn test_infinite_rate_never_waits() {
        let limiter = RateLimiter::new(f64::INFINITY);
        for _ in 0..100 {
            assert_eq!(limiter.reserve().unwrap(), Duration::ZERO);
        }
    }
}
