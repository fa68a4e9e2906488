//! Crawler module for link discovery and checking
//!
//! This module contains the core sweeping logic, including:
//! - HTTP fetching behind the [`Fetcher`] seam
//! - HTML parsing and link extraction
//! - Status checks with retry and backoff
//! - The frontier and the batch coordination loop

mod checker;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod parser;
mod retry;

#[cfg(test)]
mod testing;

pub use checker::{StatusCheck, StatusChecker};
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use extractor::LinkExtractor;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::extract_anchor_links;
pub use retry::{RetryPolicy, Retrying};
