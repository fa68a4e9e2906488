//! URL handling module for Docsweep
//!
//! This module provides host extraction, wildcard domain matching, and the
//! crawl scope that bounds link discovery to one documentation tree.

mod matcher;
mod scope;

use crate::UrlError;
use url::Url;

pub use matcher::{matches_any, matches_wildcard};
pub use scope::CrawlScope;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docsweep::url::host_of;
///
/// let url = Url::parse("https://WWW.Doi.org/10.1000/1").unwrap();
/// assert_eq!(host_of(&url), Some("www.doi.org".to_string()));
/// ```
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_lowercase())
}

/// Returns true for the schemes a status check can fetch
pub fn is_fetchable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Parses a root URL and checks that it can start a crawl
pub fn parse_root(root: &str) -> Result<Url, UrlError> {
    let url = Url::parse(root).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_fetchable_scheme(&url) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if host_of(&url).is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
