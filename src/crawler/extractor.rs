//! Link discovery
//!
//! Fetches an in-scope page and returns the links it contains. The extractor
//! never touches the frontier; the coordinator folds the returned sets in.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_anchor_links;
use crate::policy::LinkPolicy;
use crate::state::FailureKind;
use crate::url::CrawlScope;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Discovers followable links on pages inside the crawl scope
pub struct LinkExtractor {
    fetcher: Arc<dyn Fetcher>,
    policy: Arc<LinkPolicy>,
    scope: CrawlScope,
    timeout: Duration,
}

impl LinkExtractor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        policy: Arc<LinkPolicy>,
        scope: CrawlScope,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            policy,
            scope,
            timeout,
        }
    }

    /// Returns the links found on `page_url`
    ///
    /// | Situation | Result |
    /// |-----------|--------|
    /// | ignored or out-of-scope page | empty, nothing fetched |
    /// | `200 OK` | every anchor link on the page |
    /// | HTTP error (>= 400) | the page itself |
    /// | timeout | empty; the status check reports the page |
    /// | other fetch error | the page itself |
    /// | any other response | empty |
    pub async fn extract(&self, page_url: &str) -> BTreeSet<String> {
        let mut links = BTreeSet::new();

        if self.policy.is_ignored(page_url) {
            tracing::debug!("Skipping discovery on ignored URL {}", page_url);
            return links;
        }

        let url = match Url::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping discovery on unparseable URL {}: {}", page_url, e);
                return links;
            }
        };

        if !self.scope.contains(&url) {
            return links;
        }

        match self.fetcher.page(&url, self.timeout).await {
            Ok(page) if page.status == 200 => {
                // Parsing is CPU-bound; keep it off the task driving the batch
                let body = page.body;
                match tokio::task::spawn_blocking(move || extract_anchor_links(&body, &url)).await
                {
                    Ok(found) => {
                        links = found;
                        tracing::debug!("Found {} links on {}", links.len(), page_url);
                    }
                    Err(e) => tracing::error!("Failed to parse {}: {}", page_url, e),
                }
            }
            Ok(page) if page.status >= 400 => {
                tracing::error!("Error while processing {}: HTTP {}", page_url, page.status);
                links.insert(page_url.to_string());
            }
            Ok(page) => {
                tracing::debug!("No links followed on {} (HTTP {})", page_url, page.status);
            }
            Err(e) if e.kind == FailureKind::Timeout => {
                tracing::error!("Request timed out for {}", page_url);
            }
            Err(e) => {
                tracing::error!("Error while processing {}: {}", page_url, e);
                links.insert(page_url.to_string());
            }
        }

        links
    }
}
