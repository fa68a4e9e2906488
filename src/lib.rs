//! Docsweep: a broken-link sweeper for documentation sites
//!
//! This crate crawls a documentation tree from a root URL, checks the status of
//! every link it finds, and writes the broken ones to a CSV report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod policy;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Docsweep operations
///
/// Individual link failures never surface here; they are recorded as
/// [`state::LinkOutcome`] values. These variants cover setup and output problems.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid request header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("No crawl target configured")]
    NoTargets,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Docsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

// Re-export commonly used types
pub use config::{Config, Target};
pub use crawler::{run_crawl, CrawlReport};
pub use output::BrokenLink;
pub use policy::LinkPolicy;
pub use state::{FailureKind, LinkOutcome, LinkStatus};
