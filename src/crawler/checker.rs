//! Link status checking
//!
//! A single status check, without retries. Wrap it in
//! [`Retrying`](crate::crawler::Retrying) for transient failures.

use crate::crawler::fetcher::Fetcher;
use crate::policy::LinkPolicy;
use crate::state::{FailureKind, LinkOutcome, LinkStatus};
use crate::url::is_fetchable_scheme;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Checks a URL and resolves to an outcome
///
/// Implementations must never fail or panic for a bad URL; every problem is
/// expressed as a [`LinkOutcome`].
#[async_trait]
pub trait StatusCheck: Send + Sync {
    async fn check(&self, url: &str) -> LinkStatus;
}

/// Performs one status check with the link policy applied
pub struct StatusChecker {
    fetcher: Arc<dyn Fetcher>,
    policy: Arc<LinkPolicy>,
    timeout: Duration,
}

impl StatusChecker {
    pub fn new(fetcher: Arc<dyn Fetcher>, policy: Arc<LinkPolicy>, timeout: Duration) -> Self {
        Self {
            fetcher,
            policy,
            timeout,
        }
    }

    async fn check_url(&self, url: &str) -> LinkOutcome {
        if self.policy.is_ignored(url) {
            return LinkOutcome::Status(0);
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!("Unexpected error while checking {}: {}", url, e);
                return LinkOutcome::error(FailureKind::Other, e.to_string());
            }
        };

        if !is_fetchable_scheme(&parsed) {
            return LinkOutcome::error(
                FailureKind::InvalidScheme,
                format!("Invalid URL scheme: {}", parsed.scheme()),
            );
        }

        match self.fetcher.status(&parsed, self.timeout).await {
            Ok(status) if status >= 300 && self.policy.tolerates_response(&parsed, status) => {
                tracing::debug!("Tolerating HTTP {} from allow-listed {}", status, url);
                LinkOutcome::Status(200)
            }
            Ok(status) => LinkOutcome::Status(status),
            Err(e) if self.policy.suppresses_error(&e.message) => {
                tracing::debug!("Suppressing error for {}: {}", url, e);
                LinkOutcome::Status(200)
            }
            // Retrying a saturated pool only adds load; the coordinator drops these
            Err(e) if self.policy.is_saturation_artifact(&e.message) => {
                tracing::debug!("Connection pool saturated while checking {}: {}", url, e);
                LinkOutcome::error(FailureKind::Other, e.message)
            }
            Err(e) => {
                tracing::error!("Error while checking {}: {}", url, e);
                LinkOutcome::error(e.kind, e.message)
            }
        }
    }
}

#[async_trait]
impl StatusCheck for StatusChecker {
    async fn check(&self, url: &str) -> LinkStatus {
        tracing::info!("Testing URL: {}", url);
        LinkStatus::new(url, self.check_url(url).await)
    }
}
