//! HTML parser for extracting anchor links
//!
//! Only `<a href>` elements count as links. Everything else a page references
//! (stylesheets, scripts, images) is left alone.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracts the absolute URLs of all anchors in an HTML document
///
/// # Link Extraction Rules
///
/// - empty `href` attributes are skipped
/// - pure in-page anchors (`#section`) are skipped
/// - everything else is resolved against `base_url`
/// - results without a host (`mailto:`, `javascript:`, `data:`) are dropped
///
/// Fragments and query strings are kept as written; two hrefs are the same
/// link only if they resolve to the same string.
///
/// # Example
///
/// ```
/// use docsweep::crawler::extract_anchor_links;
/// use url::Url;
///
/// let html = r##"<a href="tutorials/">Tutorials</a><a href="#top">Top</a>"##;
/// let base = Url::parse("https://docs.example.com/stable/index.html").unwrap();
/// let links = extract_anchor_links(html, &base);
/// assert!(links.contains("https://docs.example.com/stable/tutorials/"));
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_anchor_links(html: &str, base_url: &Url) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(href, base_url) {
                links.insert(absolute_url);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None for empty hrefs, in-page anchors, unresolvable hrefs, and
/// results lacking a scheme or host.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    let has_host = absolute_url.host_str().is_some_and(|host| !host.is_empty());

    if absolute_url.scheme().is_empty() || !has_host {
        return None;
    }

    Some(absolute_url.to_string())
}
