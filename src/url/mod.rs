//! URL handling module for codes-mirror
//!
//! Table-of-contents links on the site are written relative to the document
//! path and sometimes repeat it. Child URLs are rebuilt from the configured
//! base so every node in a tree shares the same origin and document prefix.

use url::Url;

/// Builds the absolute URL of a child page from a table-of-contents href
///
/// The href is resolved against the base, every occurrence of the document
/// segment is removed from its path, and the rest is re-joined as
/// `{base}{document}/{rest}`. The query string, if any, is kept.
///
/// # Examples
///
/// ```
/// use codes_mirror::url::resolve_child_url;
/// use url::Url;
///
/// let base = Url::parse("https://codes.ohio.gov/").unwrap();
/// assert_eq!(
///     resolve_child_url(&base, "ohio-constitution", "/ohio-constitution/article-1"),
///     "https://codes.ohio.gov/ohio-constitution/article-1"
/// );
/// ```
pub fn resolve_child_url(base_url: &Url, document: &str, href: &str) -> String {
    let href = href.trim();

    let (path, query) = match base_url.join(href) {
        Ok(resolved) => (resolved.path().to_string(), resolved.query().map(str::to_string)),
        Err(_) => (href.to_string(), None),
    };

    let stripped = path.replace(document, "");
    let cleaned = stripped.trim_matches('/');

    let mut url = format!("{}{}/{}", base_url, document, cleaned);
    if let Some(query) = query {
        url.push('?');
        url.push_str(&query);
    }
    url
}
