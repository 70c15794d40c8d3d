// src/services/dispatcher.rs

//! Bounded fan-out of the article list into a shared `WordCounter`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;

use crate::models::{CrawlOutcome, CrawlerConfig};
use crate::services::{ArticleFetcher, ContentExtractor, FetchOutcome, WordCounter};
use crate::utils::article_url;

/// Worker pool settings.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub workers: usize,
    /// Log a progress line every N processed articles (0 disables)
    pub progress: usize,
    pub html_suffix: bool,
}

impl DispatchSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            workers: config.workers,
            progress: config.progress,
            html_suffix: config.html_suffix,
        }
    }
}

/// Processes a fixed article list with at most `workers` articles in flight.
pub struct Dispatcher {
    fetcher: ArticleFetcher,
    extractor: Arc<ContentExtractor>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        fetcher: ArticleFetcher,
        extractor: Arc<ContentExtractor>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            settings,
        }
    }

    /// Process every article once and return after the last one is done.
    pub async fn run(&self, articles: Vec<String>, counter: Arc<WordCounter>) -> CrawlOutcome {
        let started_at = Utc::now();
        let total = articles.len();
        let workers = self.settings.workers.max(1);
        let tracker = Arc::new(ProgressTracker::new(total, self.settings.progress));

        log::info!("Dispatching {} articles to {} workers", total, workers);

        // Each article runs on its own task so fetches and parsing spread
        // across the runtime's threads.
        let mut jobs = stream::iter(articles)
            .map(|reference| {
                let job = ArticleJob {
                    fetcher: self.fetcher.clone(),
                    extractor: Arc::clone(&self.extractor),
                    counter: Arc::clone(&counter),
                    tracker: Arc::clone(&tracker),
                    html_suffix: self.settings.html_suffix,
                };
                tokio::spawn(async move { job.process(reference).await })
            })
            .buffer_unordered(workers);

        while let Some(result) = jobs.next().await {
            if let Err(e) = result {
                log::error!("Article task exited abnormally: {}", e);
            }
        }

        let fetched = tracker.fetched.load(Ordering::Relaxed);
        CrawlOutcome {
            article_total: total,
            fetched,
            // Anything not counted was dropped, including an article lost to a task panic.
            abandoned: total - fetched,
            throttle_retries: tracker.throttle_retries.load(Ordering::Relaxed),
            started_at,
            finished_at: Utc::now(),
        }
    }
}

struct ArticleJob {
    fetcher: ArticleFetcher,
    extractor: Arc<ContentExtractor>,
    counter: Arc<WordCounter>,
    tracker: Arc<ProgressTracker>,
    html_suffix: bool,
}

impl ArticleJob {
    async fn process(self, reference: String) {
        let url = article_url(&reference, self.html_suffix);
        let outcome = self.fetcher.fetch(&url).await;

        if let FetchOutcome::Fetched { body, .. } = &outcome {
            for text in self.extractor.extract(body) {
                self.counter.count_text(&text);
            }
        }

        self.tracker.record(&outcome);
    }
}

/// Shared run counters. Progress lines are best-effort.
struct ProgressTracker {
    processed: AtomicUsize,
    fetched: AtomicUsize,
    throttle_retries: AtomicU64,
    total: usize,
    every: usize,
    started: Instant,
}

impl ProgressTracker {
    fn new(total: usize, every: usize) -> Self {
        Self {
            processed: AtomicUsize::new(0),
            fetched: AtomicUsize::new(0),
            throttle_retries: AtomicU64::new(0),
            total,
            every,
            started: Instant::now(),
        }
    }

    fn record(&self, outcome: &FetchOutcome) {
        if matches!(outcome, FetchOutcome::Fetched { .. }) {
            self.fetched.fetch_add(1, Ordering::Relaxed);
        }
        self.throttle_retries
            .fetch_add(u64::from(outcome.throttled()), Ordering::Relaxed);

        let done = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.every > 0 && done % self.every == 0 {
            log::info!(
                "progress [{} / {}]: {:?}",
                done,
                self.total,
                self.started.elapsed()
            );
        }
    }
}
