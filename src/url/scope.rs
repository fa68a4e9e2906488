use crate::url::host_of;
use crate::UrlError;
use url::Url;

/// The part of a site a crawl is allowed to follow
///
/// A page is in scope when it lives on the same host and port as the root URL
/// and under the same first path segment. For a root of
/// `https://auto.gluon.ai/stable/index.html` that is everything below
/// `auto.gluon.ai/stable/`, which keeps a crawl of one documentation version
/// out of its sibling trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    host: String,
    port: Option<u16>,
    first_segment: String,
}

impl CrawlScope {
    /// Derives the scope from a root URL
    pub fn from_root(root: &Url) -> Result<Self, UrlError> {
        let host = host_of(root).ok_or(UrlError::MissingDomain)?;
        Ok(Self {
            host,
            port: root.port_or_known_default(),
            first_segment: first_path_segment(root).to_string(),
        })
    }

    /// Returns true if links on this page should be followed
    pub fn contains(&self, url: &Url) -> bool {
        host_of(url).as_deref() == Some(self.host.as_str())
            && url.port_or_known_default() == self.port
            && first_path_segment(url) == self.first_segment
    }
}

/// First segment of the URL path ("" for the site root)
fn first_path_segment(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next())
        .unwrap_or("")
}
