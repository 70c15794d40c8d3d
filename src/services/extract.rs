// src/services/extract.rs

//! Visible-text extraction from article HTML.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};

/// Pulls the text of the regions matching a CSS selector.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    selector: Selector,
}

impl ContentExtractor {
    pub fn new(selector: &str) -> Result<Self> {
        let parsed =
            Selector::parse(selector).map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
        Ok(Self { selector: parsed })
    }

    /// Text of each matching element, in document order.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.selector)
            .map(|element| element.text().collect::<String>())
            .collect()
    }
}
