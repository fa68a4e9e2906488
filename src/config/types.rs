use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Docsweep
///
/// Every section falls back to its defaults, so an empty file is a
/// valid configuration (it just has no targets yet).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    pub headers: HeaderConfig,
    pub policy: PolicyConfig,
    pub output: OutputConfig,
    #[serde(rename = "target")]
    pub targets: Vec<Target>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Batch width shared by the discovery and validation phases.
    /// Defaults to twice the available parallelism.
    pub concurrency: Option<usize>,

    /// Timeout for page fetches during link discovery (seconds)
    #[serde(rename = "discovery-timeout")]
    pub discovery_timeout: u64,

    /// Timeout for status-check fetches (seconds)
    #[serde(rename = "validation-timeout")]
    pub validation_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            discovery_timeout: 5,
            validation_timeout: 20,
        }
    }
}

impl CrawlerConfig {
    /// Returns the configured batch width, or 2x the available parallelism
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                * 2
        })
    }
}

/// Retry/backoff configuration for status checks
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Exponential backoff multiplier
    pub multiplier: f64,

    /// Lower bound of a single wait (time units)
    #[serde(rename = "min-wait")]
    pub min_wait: f64,

    /// Upper bound of a single wait (time units)
    #[serde(rename = "max-wait")]
    pub max_wait: f64,

    /// Length of one time unit in milliseconds
    #[serde(rename = "time-unit-ms")]
    pub time_unit_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            multiplier: 1.0,
            min_wait: 4.0,
            max_wait: 20.0,
            time_unit_ms: 1000,
        }
    }
}

/// Browser-like request headers sent with every fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent:
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:106.0) Gecko/20100101 Firefox/106.0"
                    .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// Link exception rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Domain patterns (e.g., "doi.org" or "*.doi.org") whose defensive
    /// responses are treated as healthy
    #[serde(rename = "defensive-domains")]
    pub defensive_domains: Vec<String>,

    /// Status codes considered defensive for the domains above
    #[serde(rename = "defensive-codes")]
    pub defensive_codes: Vec<u16>,

    /// URLs containing any of these substrings are never crawled or checked
    #[serde(rename = "ignored-substrings")]
    pub ignored_substrings: Vec<String>,

    /// URLs whose last `.` segment is one of these are never crawled or checked
    #[serde(rename = "ignored-extensions")]
    pub ignored_extensions: Vec<String>,

    /// Error text markers that turn a failed fetch into a healthy outcome
    #[serde(rename = "suppressed-errors")]
    pub suppressed_errors: Vec<String>,

    /// Error text markers of connection-pool saturation, dropped from reports
    #[serde(rename = "saturation-markers")]
    pub saturation_markers: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            defensive_domains: vec![
                "*.sciencedirect.com".to_string(),
                "*.openai.com".to_string(),
                "*.doi.org".to_string(),
                "*.machinehack.com".to_string(),
            ],
            defensive_codes: vec![301, 302, 307, 308, 403],
            ignored_substrings: vec![
                "twitter".to_string(),
                "kaggle.com".to_string(),
                "anaconda.org/conda-forge".to_string(),
            ],
            ignored_extensions: vec!["ipynb".to_string()],
            suppressed_errors: vec![
                "nodename nor servname provided".to_string(),
                "Connection reset by peer".to_string(),
            ],
            saturation_markers: vec![
                "HTTPSConnectionPool".to_string(),
                "connection pool".to_string(),
            ],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the CSV reports are written to
    pub directory: PathBuf,

    /// File name prefix; the report is named "<prefix> <label>.csv"
    #[serde(rename = "file-prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: "Broken Links".to_string(),
        }
    }
}

impl OutputConfig {
    /// Path of the report written for the given target label
    pub fn report_path(&self, label: &str) -> PathBuf {
        self.directory
            .join(format!("{} {}.csv", self.file_prefix, label))
    }
}

/// A documentation tree to sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    /// Root page of the tree, e.g. "https://auto.gluon.ai/stable/index.html"
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Label used in the report file name
    pub label: String,
}
