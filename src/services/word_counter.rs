// src/services/word_counter.rs

//! End-to-end top words service.
//!
//! Retrieves the inputs, seeds the tally from the vocabulary, crawls the
//! articles and ranks the result.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, CrawlOutcome, WordCount};
use crate::services::{
    ArticleFetcher, ContentExtractor, DispatchSettings, Dispatcher, RateLimiter, RetryPolicy,
    VocabularyFilter, WordCounter,
};
use crate::storage::ArtifactFetcher;
use crate::utils::http::HttpFetcher;

/// Ranked words plus the crawl summary that produced them.
#[derive(Debug, Clone)]
pub struct TopWordsReport {
    pub words: Vec<WordCount>,
    pub outcome: CrawlOutcome,
}

/// Service that finds the most frequent vocabulary words across articles.
pub struct WordCounterService {
    artifacts: Arc<dyn ArtifactFetcher>,
    dispatcher: Dispatcher,
    filter: VocabularyFilter,
}

impl WordCounterService {
    /// Build the service from configuration.
    ///
    /// The rate limiter created here is shared by every worker of every run.
    pub fn new(
        http: Arc<dyn HttpFetcher>,
        artifacts: Arc<dyn ArtifactFetcher>,
        config: &Config,
    ) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::with_fallback(
            config.crawler.rps,
            config.crawler.limiter_fallback(),
        ));
        let fetcher = ArticleFetcher::new(http, limiter, RetryPolicy::from_config(&config.crawler));
        let extractor = Arc::new(ContentExtractor::new(&config.extraction.content_selector)?);
        let dispatcher = Dispatcher::new(
            fetcher,
            extractor,
            DispatchSettings::from_config(&config.crawler),
        );

        Ok(Self {
            artifacts,
            dispatcher,
            filter: VocabularyFilter::new(config.extraction.min_word_len),
        })
    }

    /// Top `n` words across the articles listed at `articles_url`.
    ///
    /// A non-zero `batch_size` keeps only that many articles from the front
    /// of the list.
    pub async fn find_top_words(
        &self,
        articles_url: &str,
        bank_of_words_url: &str,
        n: usize,
        batch_size: usize,
    ) -> Result<Vec<WordCount>> {
        let report = self
            .run(articles_url, bank_of_words_url, n, batch_size)
            .await?;
        Ok(report.words)
    }

    /// Same as `find_top_words`, also returning the crawl summary.
    pub async fn run(
        &self,
        articles_url: &str,
        bank_of_words_url: &str,
        n: usize,
        batch_size: usize,
    ) -> Result<TopWordsReport> {
        let lists = self.artifacts.fetch(articles_url, bank_of_words_url).await?;

        let vocabulary = self.filter.countable_set(&lists.bank_of_words);
        log::info!(
            "Loaded {} articles and {} countable words ({} in bank)",
            lists.articles.len(),
            vocabulary.len(),
            lists.bank_of_words.len()
        );

        let mut articles = lists.articles;
        if batch_size != 0 && batch_size < articles.len() {
            articles.truncate(batch_size);
            log::info!("Processing the first {} articles", batch_size);
        }

        let counter = Arc::new(WordCounter::new(vocabulary));
        let outcome = self.dispatcher.run(articles, Arc::clone(&counter)).await;

        log::info!(
            "Crawl finished: {} fetched, {} abandoned ({:.1}% success), {} throttle retries in {}s",
            outcome.fetched,
            outcome.abandoned,
            outcome.success_rate() * 100.0,
            outcome.throttle_retries,
            (outcome.finished_at - outcome.started_at).num_seconds()
        );

        Ok(TopWordsReport {
            words: counter.top_words(n),
            outcome,
        })
    }
}
