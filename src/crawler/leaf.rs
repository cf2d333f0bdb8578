//! Section page parser
//!
//! Section pages keep their text in a `.laws-body` element, one `<p>` per
//! paragraph. Indented paragraphs carry a `level-N` class. Older pages hold a
//! single `<span>` instead of paragraphs, and most pages show the effective
//! date in an info module next to the body.

use crate::crawler::markup::{find, select_all, select_first, trimmed_text};
use crate::tree::{LeafContent, Paragraph};
use scraper::{ElementRef, Html};

const LAWS_BODY: &str = ".laws-body";
const INFO_MODULE: &str = "div.laws-section-info-module";
const INFO_VALUE: &str = "div.value";

/// Parses a section page
///
/// A page without a law body is a placeholder and yields empty content.
pub fn parse_leaf(raw_html: &str) -> LeafContent {
    parse_leaf_document(&Html::parse_document(raw_html))
}

pub(crate) fn parse_leaf_document(document: &Html) -> LeafContent {
    let Some(body) = find(document, LAWS_BODY) else {
        return LeafContent::default();
    };

    let effective_date = find(document, INFO_MODULE)
        .and_then(|module| select_first(module, INFO_VALUE))
        .map(trimmed_text);

    let mut paragraphs: Vec<Paragraph> = select_all(body, "p")
        .into_iter()
        .enumerate()
        .map(|(order, p)| Paragraph {
            order,
            text: trimmed_text(p),
            indent_level: indent_level(p),
        })
        .collect();

    if paragraphs.is_empty() {
        let spans = select_all(body, "span");
        if let [span] = spans.as_slice() {
            paragraphs.push(Paragraph {
                order: 0,
                text: trimmed_text(*span),
                indent_level: None,
            });
        }
    }

    LeafContent {
        effective_date,
        paragraphs,
    }
}

/// Indentation from the last `level-N` class, as `N - 1`
///
/// Reads the raw attribute because `Element::classes` does not keep markup order.
fn indent_level(paragraph: ElementRef<'_>) -> Option<u32> {
    paragraph
        .value()
        .attr("class")?
        .split_whitespace()
        .filter_map(|class| class.strip_prefix("level-"))
        .filter_map(|level| level.parse::<u32>().ok())
        .last()?
        .checked_sub(1)
}
