//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with browser-like request headers
//! - GET requests for status checks and page bodies
//! - Error classification into transient and permanent failure kinds

use crate::config::HeaderConfig;
use crate::state::FailureKind;
use crate::SweepError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A failed fetch, already classified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code after redirects
    pub status: u16,

    /// Response body; only read for `200 OK`, empty otherwise
    pub body: String,
}

/// HTTP transport used by the crawler
///
/// Implementations never follow the crawl's policy; they only report what the
/// server said, or why it could not be reached.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GETs the URL and returns the final status code without reading the body
    async fn status(&self, url: &Url, timeout: Duration) -> Result<u16, FetchError>;

    /// GETs the URL and returns the status code and, for `200 OK`, the body
    async fn page(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client that sends the configured browser headers
///
/// Sites behind bot detection answer a bare client with 403s; the browser
/// User-Agent, Accept and Accept-Language headers avoid most of those.
///
/// # Example
///
/// ```no_run
/// use docsweep::config::HeaderConfig;
/// use docsweep::crawler::build_http_client;
///
/// let client = build_http_client(&HeaderConfig::default()).unwrap();
/// ```
pub fn build_http_client(headers: &HeaderConfig) -> Result<Client, SweepError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_str(&headers.accept)?);
    default_headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&headers.accept_language)?,
    );

    let client = Client::builder()
        .user_agent(headers.user_agent.as_str())
        .default_headers(default_headers)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// `Fetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a fresh client
    pub fn new(headers: &HeaderConfig) -> Result<Self, SweepError> {
        Ok(Self::with_client(build_http_client(headers)?))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn status(&self, url: &Url, timeout: Duration) -> Result<u16, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;

        Ok(response.status().as_u16())
    }

    async fn page(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(FetchedPage {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body = response.text().await.map_err(classify_error)?;
        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

/// Classifies a reqwest error
///
/// | Condition | Kind |
/// |-----------|------|
/// | request or body timed out | `Timeout` |
/// | host lookup failed | `Dns` |
/// | connect/request/body failure | `Connect` |
/// | URL the client refuses to build | `InvalidScheme` or `Other` |
/// | anything else (redirect loop, decode error) | `Other` |
fn classify_error(err: reqwest::Error) -> FetchError {
    let err = err.without_url();
    let message = describe_error(&err);

    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_builder() {
        if message.contains("scheme") {
            FailureKind::InvalidScheme
        } else {
            FailureKind::Other
        }
    } else if is_dns_failure(&message) {
        FailureKind::Dns
    } else if err.is_connect() || err.is_request() || err.is_body() {
        FailureKind::Connect
    } else {
        FailureKind::Other
    };

    FetchError { kind, message }
}

fn is_dns_failure(message: &str) -> bool {
    message.contains("dns error") || message.contains("failed to lookup address")
}

/// Renders an error with its whole source chain
///
/// Causes already contained in an outer message are not repeated.
fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
