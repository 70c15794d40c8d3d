//! Retrieval and local caching of the crawl inputs.
//!
//! The article list and the bank of words are plain text files, one entry
//! per line. They are downloaded once and served from a cache directory on
//! every later run.
//!
//! ## Directory Structure
//!
//! ```text
//! {cache_dir}/
//! ├── articles.txt        # One article URL per line
//! └── bank_of_words.txt   # One vocabulary word per line
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ArtifactLists;

// Re-export for convenience
pub use local::CachedArtifactFetcher;

/// Source of the article list and the bank of words.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Return every line of both sources, trimmed, in file order.
    ///
    /// Repeated calls with the same locations return the same lists.
    async fn fetch(&self, articles_url: &str, bank_of_words_url: &str) -> Result<ArtifactLists>;
}
