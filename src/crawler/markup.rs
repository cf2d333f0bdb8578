//! Small query helpers over `scraper` documents

use scraper::{ElementRef, Html, Selector};

/// The table that only table-of-contents pages carry
pub(crate) const LAWS_TABLE: &str = "table.laws-table";

/// First descendant of `scope` matching `css`
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// All descendants of `scope` matching `css`, in document order
pub(crate) fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// First element in the whole document matching `css`
pub(crate) fn find<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    select_first(document.root_element(), css)
}

/// Concatenated, trimmed text content of an element
pub(crate) fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
