//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP, concurrency and retry settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Where the article and vocabulary lists come from
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Content extraction and vocabulary filtering
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Result shaping
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.workers == 0 {
            return Err(AppError::validation("crawler.workers must be > 0"));
        }
        if !self.crawler.rps.is_finite() || self.crawler.rps < 0.0 {
            return Err(AppError::validation(
                "crawler.rps must be a finite, non-negative number",
            ));
        }
        if !(100..=999).contains(&self.crawler.throttle_status) {
            return Err(AppError::validation(
                "crawler.throttle_status must be within 100..=999",
            ));
        }
        if self.extraction.min_word_len == 0 {
            return Err(AppError::validation("extraction.min_word_len must be > 0"));
        }
        Selector::parse(&self.extraction.content_selector).map_err(|e| {
            AppError::selector(&self.extraction.content_selector, format!("{e:?}"))
        })?;
        url::Url::parse(&self.sources.articles_url)?;
        url::Url::parse(&self.sources.bank_of_words_url)?;
        Ok(())
    }
}

/// HTTP client, concurrency and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Aggregate outbound requests per second across all workers
    #[serde(default = "defaults::rps")]
    pub rps: f64,

    /// Number of concurrent workers
    #[serde(default = "defaults::workers")]
    pub workers: usize,

    /// Log a progress line every N processed articles (0 disables)
    #[serde(default = "defaults::progress")]
    pub progress: usize,

    /// Status code the remote uses to signal throttling
    #[serde(default = "defaults::throttle_status")]
    pub throttle_status: u16,

    /// Sleep after the first throttle response for an article
    #[serde(default = "defaults::long_backoff")]
    pub long_backoff_secs: u64,

    /// Sleep after every later throttle response for the same article
    #[serde(default = "defaults::short_backoff")]
    pub short_backoff_secs: u64,

    /// Delay used when the rate limiter cannot grant a token
    #[serde(default = "defaults::limiter_fallback")]
    pub limiter_fallback_ms: u64,

    /// Replace a trailing `/` in article references with `.html`
    #[serde(default = "defaults::html_suffix")]
    pub html_suffix: bool,
}

impl CrawlerConfig {
    pub fn long_backoff(&self) -> Duration {
        Duration::from_secs(self.long_backoff_secs)
    }

    pub fn short_backoff(&self) -> Duration {
        Duration::from_secs(self.short_backoff_secs)
    }

    pub fn limiter_fallback(&self) -> Duration {
        Duration::from_millis(self.limiter_fallback_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            rps: defaults::rps(),
            workers: defaults::workers(),
            progress: defaults::progress(),
            throttle_status: defaults::throttle_status(),
            long_backoff_secs: defaults::long_backoff(),
            short_backoff_secs: defaults::short_backoff(),
            limiter_fallback_ms: defaults::limiter_fallback(),
            html_suffix: defaults::html_suffix(),
        }
    }
}

/// Locations of the input lists and their local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// URL of the newline-separated article list
    #[serde(default = "defaults::articles_url")]
    pub articles_url: String,

    /// URL of the newline-separated bank of words
    #[serde(default = "defaults::bank_of_words_url")]
    pub bank_of_words_url: String,

    /// Directory holding cached copies of both lists
    #[serde(default = "defaults::cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "defaults::articles_cache_file")]
    pub articles_cache_file: String,

    #[serde(default = "defaults::bank_of_words_cache_file")]
    pub bank_of_words_cache_file: String,

    /// Whole-request timeout for downloading either list (0 disables)
    #[serde(default = "defaults::download_timeout")]
    pub download_timeout_secs: u64,
}

impl SourcesConfig {
    pub fn download_timeout(&self) -> Option<Duration> {
        (self.download_timeout_secs > 0).then(|| Duration::from_secs(self.download_timeout_secs))
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            articles_url: defaults::articles_url(),
            bank_of_words_url: defaults::bank_of_words_url(),
            cache_dir: defaults::cache_dir(),
            articles_cache_file: defaults::articles_cache_file(),
            bank_of_words_cache_file: defaults::bank_of_words_cache_file(),
            download_timeout_secs: defaults::download_timeout(),
        }
    }
}

/// Content extraction and vocabulary filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// CSS selector for the article regions whose text is counted
    #[serde(default = "defaults::content_selector")]
    pub content_selector: String,

    /// Minimum length of a countable vocabulary word
    #[serde(default = "defaults::min_word_len")]
    pub min_word_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            content_selector: defaults::content_selector(),
            min_word_len: defaults::min_word_len(),
        }
    }
}

/// Result shaping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of top words to report
    #[serde(default = "defaults::top_n")]
    pub top_n: usize,

    /// Process only the first N articles (0 processes all)
    #[serde(default)]
    pub batch_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_n: defaults::top_n(),
            batch_size: 0,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; wordcrawl/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn rps() -> f64 {
        2.0
    }
    pub fn workers() -> usize {
        8
    }
    pub fn progress() -> usize {
        100
    }
    pub fn throttle_status() -> u16 {
        999
    }
    pub fn long_backoff() -> u64 {
        4 * 60
    }
    pub fn short_backoff() -> u64 {
        30
    }
    pub fn limiter_fallback() -> u64 {
        1000
    }
    pub fn html_suffix() -> bool {
        true
    }

    // Source defaults
    pub fn articles_url() -> String {
        "https://drive.google.com/uc?id=1TF4RPuj8iFwpa-lyhxG67V8NDlktmTGi&export=download".into()
    }
    pub fn bank_of_words_url() -> String {
        "https://raw.githubusercontent.com/dwyl/english-words/master/words.txt".into()
    }
    pub fn cache_dir() -> PathBuf {
        PathBuf::from("tmp")
    }
    pub fn articles_cache_file() -> String {
        "articles.txt".into()
    }
    pub fn bank_of_words_cache_file() -> String {
        "bank_of_words.txt".into()
    }
    pub fn download_timeout() -> u64 {
        10 * 60
    }

    // Extraction defaults
    pub fn content_selector() -> String {
        ".caas-body,.caas-header".into()
    }
    pub fn min_word_len() -> usize {
        3
    }

    // Output defaults
    pub fn top_n() -> usize {
        10
    }
}
