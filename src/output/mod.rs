//! Output module for broken-link reports and crawl statistics
//!
//! This module handles:
//! - The broken-link record and the `ReportSink` trait
//! - Writing reports as CSV
//! - Collecting and printing per-target crawl statistics

mod csv_report;
pub mod stats;
mod traits;

pub use csv_report::{CsvReport, REPORT_COLUMNS};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{Breakage, BrokenLink, OutputError, OutputResult, ReportSink};
