//! Utility functions and helpers.

pub mod http;

/// Turn an article reference into the URL that is actually requested.
///
/// With `html_suffix` set, a reference ending in `/` has the slash replaced
/// by `.html`, which the article host serves without a redirect.
pub fn article_url(reference: &str, html_suffix: bool) -> String {
    match reference.strip_suffix('/') {
        Some(stem) if html_suffix => format!("{stem}.html"),
        _ => reference.to_string(),
    }
}

/// Split a text document into trimmed lines, preserving file order.
pub fn trimmed_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_matches([' ', '\t', '\r', '\n']).to_string())
        .collect()
}
