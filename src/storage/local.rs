//! Local filesystem cache for the crawl inputs.
//!
//! A list is downloaded only when its cache file is missing. Downloads are
//! written to a temporary file and renamed into place, so a failed download
//! never leaves a truncated cache behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{ArtifactLists, SourcesConfig};
use crate::storage::ArtifactFetcher;
use crate::utils::http::HttpFetcher;
use crate::utils::trimmed_lines;

/// `ArtifactFetcher` that caches both lists under a local directory.
#[derive(Clone)]
pub struct CachedArtifactFetcher {
    http: Arc<dyn HttpFetcher>,
    cache_dir: PathBuf,
    articles_file: String,
    bank_of_words_file: String,
}

impl CachedArtifactFetcher {
    pub fn new(
        http: Arc<dyn HttpFetcher>,
        cache_dir: impl Into<PathBuf>,
        articles_file: impl Into<String>,
        bank_of_words_file: impl Into<String>,
    ) -> Self {
        Self {
            http,
            cache_dir: cache_dir.into(),
            articles_file: articles_file.into(),
            bank_of_words_file: bank_of_words_file.into(),
        }
    }

    pub fn from_config(http: Arc<dyn HttpFetcher>, sources: &SourcesConfig) -> Self {
        Self::new(
            http,
            &sources.cache_dir,
            &sources.articles_cache_file,
            &sources.bank_of_words_cache_file,
        )
    }

    /// Get the full path for a cache file name.
    fn path(&self, file_name: &str) -> PathBuf {
        self.cache_dir.join(file_name)
    }

    /// Read a list from cache, downloading it first if needed.
    async fn get_lines(&self, url: &str, file_name: &str) -> Result<Vec<String>> {
        let path = self.path(file_name);

        match tokio::fs::try_exists(&path).await {
            Ok(true) => log::debug!("Using cached {}", path.display()),
            Ok(false) => {
                tokio::fs::create_dir_all(&self.cache_dir)
                    .await
                    .map_err(|e| AppError::artifact(self.cache_dir.display().to_string(), e))?;
                self.download(url, &path).await?;
            }
            Err(e) => return Err(AppError::artifact(path.display().to_string(), e)),
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::artifact(path.display().to_string(), e))?;
        Ok(trimmed_lines(&content))
    }

    /// Download `url` into `path` atomically.
    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        log::info!("Downloading {} to {}", url, path.display());

        let response = self
            .http
            .get(url)
            .await
            .map_err(|e| AppError::artifact(url, e))?;
        if !response.is_ok() {
            return Err(AppError::artifact(
                url,
                format!("received non-200 response status {}", response.status),
            ));
        }

        write_atomic(path, response.body.as_bytes())
            .await
            .map_err(|e| AppError::artifact(path.display().to_string(), e))
    }
}

#[async_trait]
impl ArtifactFetcher for CachedArtifactFetcher {
    async fn fetch(&self, articles_url: &str, bank_of_words_url: &str) -> Result<ArtifactLists> {
        let articles = self.get_lines(articles_url, &self.articles_file).await?;
        let bank_of_words = self
            .get_lines(bank_of_words_url, &self.bank_of_words_file)
            .await?;
        Ok(ArtifactLists {
            articles,
            bank_of_words,
        })
    }
}

/// Write bytes atomically (write to temp, then rename).
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;
    use crate::utils::http::FetchResponse;

    #[derive(Default)]
    struct CountingFetcher {
        pages: HashMap<String, FetchResponse>,
        calls: Mutex<Vec<String>>,
    }

    impl CountingFetcher {
        fn page(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages
                .insert(url.to_string(), FetchResponse::new(status, body));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpFetcher for CountingFetcher {
        async fn get(&self, url: &str) -> Result<FetchResponse> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::crawl(url, "no route"))
        }
    }

    fn fetcher(http: Arc<CountingFetcher>, dir: &Path) -> CachedArtifactFetcher {
        CachedArtifactFetcher::new(http, dir, "articles.txt", "bank_of_words.txt")
    }

    #[tokio::test]
    async fn test_downloads_then_serves_from_cache() {
        let tmp = TempDir::new().unwrap();
        let cache_dir = tmp.path().join("cache");
        let http = Arc::new(
            CountingFetcher::default()
                .page("https://articles", 200, "a1\na2\na3\n")
                .page("https://bankOfWords", 200, "w1\nw2\nw3\n"),
        );
        let fetcher = fetcher(Arc::clone(&http), &cache_dir);
        let expected = ArtifactLists {
            articles: vec!["a1".into(), "a2".into(), "a3".into()],
            bank_of_words: vec!["w1".into(), "w2".into(), "w3".into()],
        };

        let first = fetcher
            .fetch("https://articles", "https://bankOfWords")
            .await
            .unwrap();
        assert_eq!(first, expected);
        assert_eq!(http.calls().len(), 2);

        let second = fetcher
            .fetch("https://articles", "https://bankOfWords")
            .await
            .unwrap();
        assert_eq!(second, expected);
        assert_eq!(http.calls().len(), 2);
        assert!(cache_dir.join("articles.txt").exists());
    }

    #[tokio::test]
    async fn test_lines_are_trimmed_in_order() {
        let tmp = TempDir::new().unwrap();
        let http = Arc::new(
            CountingFetcher::default()
                .page("https://articles", 200, "  https://b/ \n\thttps://a/\r\n")
                .page("https://words", 200, "Zebra\napple\n"),
        );

        let lists = fetcher(http, tmp.path())
            .fetch("https://articles", "https://words")
            .await
            .unwrap();

        assert_eq!(lists.articles, vec!["https://b/", "https://a/"]);
        assert_eq!(lists.bank_of_words, vec!["Zebra", "apple"]);
    }

    #[tokio::test]
    async fn test_non_200_is_an_error_and_leaves_no_cache() {
        let tmp = TempDir::new().unwrap();
        let http = Arc::new(
            CountingFetcher::default()
                .page("https://articles", 404, "not found")
                .page("https://words", 200, "word\n"),
        );

        let result = fetcher(http, tmp.path())
            .fetch("https://articles", "https://words")
            .await;

        assert!(matches!(result, Err(AppError::Artifact { .. })));
        assert!(!tmp.path().join("articles.txt").exists());
        assert!(!tmp.path().join("articles.tmp").exists());
    }

    #[tokio::test]
    async fn test_transport_error_is_an_artifact_error() {
        let tmp = TempDir::new().unwrap();
        let http = Arc::new(CountingFetcher::default());

        let result = fetcher(http, tmp.path())
            .fetch("https://articles", "https://words")
            .await;

        assert!(matches!(result, Err(AppError::Artifact { .. })));
    }

    #[tokio::test]
    async fn test_existing_cache_skips_network() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("articles.txt"), "cached\n").unwrap();
        std::fs::write(tmp.path().join("bank_of_words.txt"), "words\n").unwrap();
        let http = Arc::new(CountingFetcher::default());

        let lists = fetcher(Arc::clone(&http), tmp.path())
            .fetch("https://articles", "https://words")
            .await
            .unwrap();

        assert_eq!(lists.articles, vec!["cached"]);
        assert_eq!(lists.bank_of_words, vec!["words"]);
        assert!(http.calls().is_empty());
    }
}
