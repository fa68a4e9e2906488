//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the batch loop that sweeps one target:
//! - Taking a batch of unvisited URLs from the frontier
//! - Discovering links on every page of the batch
//! - Checking the status of every URL of the batch
//! - Turning broken outcomes into report records
//!
//! The two phases of a batch are separated by barriers: validation starts
//! only after every discovery task of the batch has finished, and the next
//! batch starts only after every status check has finished. Tasks return
//! values; only the coordinator mutates the frontier and the record list.

use crate::config::{Config, Target};
use crate::crawler::checker::{StatusCheck, StatusChecker};
use crate::crawler::extractor::LinkExtractor;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::retry::{RetryPolicy, Retrying};
use crate::output::{BrokenLink, CrawlStatistics, CsvReport, ReportSink};
use crate::policy::{LinkPolicy, Verdict};
use crate::state::{FailureKind, LinkOutcome, LinkStatus};
use crate::url::{parse_root, CrawlScope};
use crate::SweepError;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Broken links in the order they were found
    pub broken_links: Vec<BrokenLink>,

    /// Counters for the run
    pub statistics: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    concurrency: usize,
    policy: Arc<LinkPolicy>,
    extractor: LinkExtractor,
    checker: Box<dyn StatusCheck>,
    frontier: Frontier,
    broken: Vec<BrokenLink>,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a coordinator that talks HTTP through reqwest
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SweepError)` - Bad root URL or unbuildable HTTP client
    pub fn new(config: &Config, target: &Target) -> Result<Self, SweepError> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.headers)?);
        Self::with_fetcher(config, target, fetcher)
    }

    /// Creates a coordinator on top of any transport
    pub fn with_fetcher(
        config: &Config,
        target: &Target,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, SweepError> {
        let root = parse_root(&target.root_url)?;
        let scope = CrawlScope::from_root(&root)?;
        let policy = Arc::new(LinkPolicy::new(&config.policy));

        let extractor = LinkExtractor::new(
            fetcher.clone(),
            policy.clone(),
            scope,
            Duration::from_secs(config.crawler.discovery_timeout),
        );

        let checker = Retrying::new(
            StatusChecker::new(
                fetcher,
                policy.clone(),
                Duration::from_secs(config.crawler.validation_timeout),
            ),
            RetryPolicy::from_config(&config.retry),
        );

        Ok(Self {
            concurrency: config.crawler.effective_concurrency().max(1),
            policy,
            extractor,
            checker: Box::new(checker),
            frontier: Frontier::new(root.as_str()),
            broken: Vec::new(),
            stats: CrawlStatistics::new(root.as_str(), &target.label),
        })
    }

    /// Runs batches until every discovered URL has been visited
    pub async fn run(mut self) -> CrawlReport {
        tracing::info!(
            "Starting sweep of {} with concurrency {}",
            self.stats.root_url,
            self.concurrency
        );
        let start_time = Instant::now();

        while !self.frontier.is_exhausted() {
            let batch = self.frontier.next_batch(self.concurrency);
            self.stats.batches += 1;
            self.discover(&batch).await;
            self.validate(&batch).await;

            tracing::info!(
                "Batch {}: {} visited, {} pending, {} broken",
                self.stats.batches,
                self.frontier.visited_count(),
                self.frontier.pending_count(),
                self.broken.len()
            );
        }
        tracing::info!("Frontier is exhausted, sweep complete");

        self.stats.duration = start_time.elapsed();
        self.stats.links_discovered = self.frontier.discovered_count() as u64;
        self.stats.pages_visited = self.frontier.visited_count() as u64;
        self.stats.broken_links = self.broken.len() as u64;

        tracing::info!(
            "Sweep of {} completed: {} links checked, {} broken, in {:?}",
            self.stats.root_url,
            self.stats.links_checked,
            self.stats.broken_links,
            self.stats.duration
        );

        CrawlReport {
            broken_links: self.broken,
            statistics: self.stats,
        }
    }

    /// Discovery phase: extracts links from every page of the batch
    async fn discover(&mut self, batch: &[String]) {
        let extractor = &self.extractor;
        let mut results = stream::iter(batch)
            .map(|page| async move {
                let links = AssertUnwindSafe(extractor.extract(page))
                    .catch_unwind()
                    .await;
                (page, links)
            })
            .buffer_unordered(self.concurrency);

        let mut new_links = 0;
        while let Some((page, links)) = results.next().await {
            match links {
                Ok(links) => {
                    for link in &links {
                        if self.frontier.discover(link, page) {
                            new_links += 1;
                        }
                    }
                }
                Err(_) => tracing::error!("Link discovery panicked for {}", page),
            }
        }

        tracing::debug!("Discovered {} new links", new_links);
    }

    /// Validation phase: checks every URL of the batch
    async fn validate(&mut self, batch: &[String]) {
        let checker = &self.checker;
        let mut results = stream::iter(batch)
            .map(|url| async move {
                AssertUnwindSafe(checker.check(url))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        tracing::error!("Unexpected fault while checking {}", url);
                        LinkStatus::new(
                            url.as_str(),
                            LinkOutcome::error(FailureKind::Other, "unexpected fault while checking"),
                        )
                    })
            })
            .buffer_unordered(self.concurrency);

        while let Some(status) = results.next().await {
            self.stats.links_checked += 1;

            match self.policy.assess(&status.outcome) {
                Verdict::Healthy => {}
                Verdict::Saturated => {
                    tracing::debug!("Dropping saturation artifact for {}", status.url);
                    self.stats.saturation_dropped += 1;
                }
                Verdict::Broken(breakage) => {
                    let origin = self
                        .frontier
                        .origin_of(&status.url)
                        .unwrap_or(status.url.as_str())
                        .to_string();
                    tracing::info!("Broken link {} ({}) on {}", status.url, breakage, origin);
                    self.broken.push(BrokenLink {
                        origin,
                        breakage,
                        url: status.url,
                    });
                }
            }
        }
    }
}

/// Sweeps one target and writes its CSV report
///
/// Individual link failures never make this fail; only setup and report
/// writing errors do.
///
/// # Example
///
/// ```no_run
/// use docsweep::config::{load_config, Target};
/// use docsweep::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("docsweep.toml"))?;
/// let target = Target {
///     root_url: "https://auto.gluon.ai/stable/index.html".to_string(),
///     label: "Stable".to_string(),
/// };
/// let report = run_crawl(&config, &target).await?;
/// println!("{} broken links", report.broken_links.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, target: &Target) -> crate::Result<CrawlReport> {
    let coordinator = Coordinator::new(config, target)?;
    let report = coordinator.run().await;

    CsvReport::new(config.output.report_path(&target.label)).write_report(&report.broken_links)?;

    Ok(report)
}
