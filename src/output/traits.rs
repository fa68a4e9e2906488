//! Report sink traits and types
//!
//! This module defines the trait interface for report sinks and the
//! broken-link record they serialize.

use std::fmt;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Why a link was reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Breakage {
    /// HTTP status code of the response
    Status(u16),

    /// Shortened error description
    Error(String),
}

impl fmt::Display for Breakage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{}", code),
            Self::Error(label) => write!(f, "{}", label),
        }
    }
}

/// One row of the broken-link report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// The page the link was first found on
    pub origin: String,

    /// Status code or error label
    pub breakage: Breakage,

    /// The broken link itself
    pub url: String,
}

/// Trait for report sinks
///
/// A sink receives the complete, ordered list of broken links once the crawl
/// of a target has finished.
pub trait ReportSink {
    /// Writes the report
    ///
    /// An empty slice still produces a report (header only).
    fn write_report(&self, records: &[BrokenLink]) -> OutputResult<()>;
}
