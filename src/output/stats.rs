//! Crawl statistics
//!
//! Counters collected by the coordinator while it sweeps one target, and a
//! plain-text printer for the end of a run.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Crawl statistics summary for one target
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Root URL the crawl started from
    pub root_url: String,

    /// Report label of the target
    pub label: String,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the crawl
    pub duration: Duration,

    /// Number of discovery/validation batches run
    pub batches: u64,

    /// Distinct URLs discovered (including the root)
    pub links_discovered: u64,

    /// URLs that went through discovery and validation
    pub pages_visited: u64,

    /// Status checks that completed (one per visited URL)
    pub links_checked: u64,

    /// Broken-link records produced
    pub broken_links: u64,

    /// Saturation artifacts dropped from the report
    pub saturation_dropped: u64,
}

impl CrawlStatistics {
    /// Creates empty statistics for a target that starts now
    pub fn new(root_url: &str, label: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
            label: label.to_string(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
            batches: 0,
            links_discovered: 0,
            pages_visited: 0,
            links_checked: 0,
            broken_links: 0,
            saturation_dropped: 0,
        }
    }

    /// Share of checked links that were reported broken, as a percentage
    pub fn broken_rate(&self) -> f64 {
        if self.links_checked == 0 {
            return 0.0;
        }
        (self.broken_links as f64 / self.links_checked as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Sweep Statistics: {} ===\n", stats.label);

    println!("Target:");
    println!("  Root URL: {}", stats.root_url);
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Duration: {:.1}s", stats.duration.as_secs_f64());
    println!();

    println!("Overview:");
    println!("  Batches: {}", stats.batches);
    println!("  Links discovered: {}", stats.links_discovered);
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Links checked: {}", stats.links_checked);
    if stats.saturation_dropped > 0 {
        println!(
            "  Saturation artifacts dropped: {}",
            stats.saturation_dropped
        );
    }
    println!();

    println!(
        "Broken: {} ({:.1}% of checked links)",
        stats.broken_links,
        stats.broken_rate()
    );
}
