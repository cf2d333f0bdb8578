//! Page classification
//!
//! The presence of the laws table is the only signal the crawler uses to
//! decide between descending further and extracting section text.

use crate::crawler::markup::{find, LAWS_TABLE};
use scraper::Html;

/// Type of a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Lists child pages in a laws table
    TableOfContents,
    /// Section content, or a placeholder page
    Leaf,
}

/// Classifies raw page markup
///
/// # Example
///
/// ```
/// use codes_mirror::crawler::{classify, PageKind};
///
/// let html = r#"<table class="laws-table"><tr><td><a href="/x">X</a></td></tr></table>"#;
/// assert_eq!(classify(html), PageKind::TableOfContents);
/// ```
pub fn classify(raw_html: &str) -> PageKind {
    classify_document(&Html::parse_document(raw_html))
}

pub(crate) fn classify_document(document: &Html) -> PageKind {
    if find(document, LAWS_TABLE).is_some() {
        PageKind::TableOfContents
    } else {
        PageKind::Leaf
    }
}
