// src/pipeline/top_words.rs

//! Top words pipeline.

use std::sync::Arc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{TopWordsReport, WordCounterService};
use crate::storage::CachedArtifactFetcher;
use crate::utils::http::{HttpFetcher, ReqwestFetcher};

/// Run the full crawl described by `config` against the live network.
pub async fn run_top_words(config: &Config) -> Result<TopWordsReport> {
    config.validate()?;

    let pages = ReqwestFetcher::from_config(&config.crawler)?;
    let lists = pages
        .clone()
        .with_timeout(config.sources.download_timeout());

    let http: Arc<dyn HttpFetcher> = Arc::new(pages);
    let artifacts = Arc::new(CachedArtifactFetcher::from_config(
        Arc::new(lists),
        &config.sources,
    ));

    log::info!(
        "Starting crawl: {} workers, {} req/s, throttle status {}",
        config.crawler.workers,
        config.crawler.rps,
        config.crawler.throttle_status
    );

    let service = WordCounterService::new(http, artifacts, config)?;
    service
        .run(
            &config.sources.articles_url,
            &config.sources.bank_of_words_url,
            config.output.top_n,
            config.output.batch_size,
        )
        .await
}
