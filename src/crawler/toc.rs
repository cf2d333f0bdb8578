//! Table-of-contents parser
//!
//! Extracts the child pages listed in a laws table. Link labels come in two
//! shapes on the site:
//!
//! - `<a href="...">Section 1.01, Definitions</a>`: the name is whatever
//!   follows the last comma
//! - `<a href="...">Article I<span>|</span> Bill of Rights</a>`: the name
//!   precedes the span and the subtitle follows it

use crate::crawler::markup::{find, select_all, select_first, trimmed_text, LAWS_TABLE};
use crate::tree::Node;
use crate::url::resolve_child_url;
use indexmap::IndexMap;
use scraper::{ElementRef, Html, Node as DomNode};
use url::Url;

/// Parses a table-of-contents page into unvisited child nodes
///
/// Children are returned in link order. When two links normalize to the same
/// name, the later link's URL wins while the first position is kept. The
/// earlier title survives unless the later link carries its own.
///
/// # Arguments
///
/// * `raw_html` - The page markup
/// * `base_url` - Site base URL, ending with a slash
/// * `document` - Document path segment, e.g. `ohio-revised-code`
pub fn parse_toc(raw_html: &str, base_url: &Url, document: &str) -> IndexMap<String, Node> {
    parse_toc_document(&Html::parse_document(raw_html), base_url, document)
}

pub(crate) fn parse_toc_document(
    document_html: &Html,
    base_url: &Url,
    document: &str,
) -> IndexMap<String, Node> {
    let mut toc = IndexMap::new();

    let Some(table) = find(document_html, LAWS_TABLE) else {
        return toc;
    };

    for link in select_all(table, "a") {
        let element = link.value();

        // Styled and external links are not part of the hierarchy
        if element.attr("class").is_some() || element.attr("target").is_some() {
            continue;
        }

        let Some(href) = element.attr("href") else {
            tracing::debug!("Skipping laws-table link without href");
            continue;
        };

        let (label, title) = match select_first(link, "span") {
            Some(span) => split_on_span(link, span),
            None => (trimmed_text(link), None),
        };

        let name = normalize_name(&label);
        if name.is_empty() {
            tracing::debug!("Skipping laws-table link with empty name: {}", href);
            continue;
        }

        let url = resolve_child_url(base_url, document, href);
        let title = title.or_else(|| toc.get(name).and_then(|earlier: &Node| earlier.title.clone()));
        toc.insert(name.to_string(), Node::with_title(url, title));
    }

    toc
}

/// Splits a link label around its nested span
///
/// Returns the text before the span and the subtitle. The subtitle is the
/// text right after the span, or the span's own text when nothing follows.
fn split_on_span(link: ElementRef<'_>, span: ElementRef<'_>) -> (String, Option<String>) {
    let full: String = link.text().collect();
    let span_text: String = span.text().collect();

    let label = if span_text.is_empty() {
        full.trim().to_string()
    } else {
        full.split(span_text.as_str())
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let title = trailing_text(span)
        .or_else(|| Some(span_text.trim().to_string()))
        .filter(|t| !t.is_empty());

    (label, title)
}

/// Trimmed text of the node immediately following an element
fn trailing_text(element: ElementRef<'_>) -> Option<String> {
    let sibling = element.next_sibling()?;
    let text = match sibling.value() {
        DomNode::Text(text) => text.trim().to_string(),
        DomNode::Element(_) => trimmed_text(ElementRef::wrap(sibling)?),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}

/// Keeps the part of a label after its last comma
fn normalize_name(label: &str) -> &str {
    label.rsplit(',').next().unwrap_or(label).trim()
}
