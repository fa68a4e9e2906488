//! In-memory fetcher for unit tests

use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::state::FailureKind;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Canned answer for one URL
#[derive(Debug, Clone)]
pub enum Stub {
    Page { status: u16, body: String },
    Fail { kind: FailureKind, message: String },
}

/// Serves canned responses; unknown URLs answer 404
#[derive(Debug, Default)]
pub struct StubFetcher {
    stubs: HashMap<String, Stub>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.stubs.insert(
            url.to_string(),
            Stub::Page {
                status: 200,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.stubs.insert(
            url.to_string(),
            Stub::Page {
                status,
                body: String::new(),
            },
        );
        self
    }

    pub fn fail(mut self, url: &str, kind: FailureKind, message: &str) -> Self {
        self.stubs.insert(
            url.to_string(),
            Stub::Fail {
                kind,
                message: message.to_string(),
            },
        );
        self
    }

    /// Number of fetches (of either kind) made for the URL
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn respond(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        match self.stubs.get(url.as_str()) {
            Some(Stub::Page { status, body }) => Ok(FetchedPage {
                status: *status,
                body: body.clone(),
            }),
            Some(Stub::Fail { kind, message }) => Err(FetchError::new(*kind, message.clone())),
            None => Ok(FetchedPage {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn status(&self, url: &Url, _timeout: Duration) -> Result<u16, FetchError> {
        self.respond(url).map(|page| page.status)
    }

    async fn page(&self, url: &Url, _timeout: Duration) -> Result<FetchedPage, FetchError> {
        self.respond(url)
    }
}
