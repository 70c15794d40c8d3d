// src/models/mod.rs

//! Domain models for the word crawler.
//!
//! This module contains the data structures shared between services,
//! organized by their primary purpose.

mod config;
mod outcome;
mod word;

// Re-export all public types
pub use config::{Config, CrawlerConfig, ExtractionConfig, OutputConfig, SourcesConfig};
pub use outcome::CrawlOutcome;
pub use word::{ArtifactLists, TopWordsResponse, WordCount};
