//! Link exception policy
//!
//! This module holds the rules that decide which URLs are skipped entirely,
//! which responses and errors are false positives, and how a final outcome is
//! judged once all retries are done.
//!
//! # Rule order for a finished check
//!
//! | Outcome | Verdict |
//! |---------|---------|
//! | error text with a saturation marker | `Saturated` (dropped) |
//! | any other error | `Broken`, labelled with the first two `:` segments |
//! | status >= 400, except 405 | `Broken` |
//! | anything else (including the `0` of an ignored URL) | `Healthy` |

use crate::config::PolicyConfig;
use crate::output::Breakage;
use crate::state::LinkOutcome;
use crate::url::{host_of, matches_any};
use url::Url;

/// Method Not Allowed shows up for HEAD/GET mismatches on healthy pages
const METHOD_NOT_ALLOWED: u16 = 405;

/// Verdict for a finished link check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to report
    Healthy,

    /// Connection-pool saturation artifact, not a real break
    Saturated,

    /// The link is broken; the payload goes into the report
    Broken(Breakage),
}

/// Compiled link exception rules
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    defensive_domains: Vec<String>,
    defensive_codes: Vec<u16>,
    ignored_substrings: Vec<String>,
    ignored_extensions: Vec<String>,
    suppressed_errors: Vec<String>,
    saturation_markers: Vec<String>,
}

impl LinkPolicy {
    /// Builds the policy from configuration
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            defensive_domains: config
                .defensive_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            defensive_codes: config.defensive_codes.clone(),
            ignored_substrings: config.ignored_substrings.clone(),
            ignored_extensions: config.ignored_extensions.clone(),
            suppressed_errors: config.suppressed_errors.clone(),
            saturation_markers: config.saturation_markers.clone(),
        }
    }

    /// Returns true if the URL must never be crawled or checked
    ///
    /// A URL is ignored when the text after its last `.` is an ignored
    /// extension, or when it contains any ignored substring.
    pub fn is_ignored(&self, url: &str) -> bool {
        let extension = url.rsplit('.').next().unwrap_or("");
        self.ignored_extensions.iter().any(|ext| ext == extension)
            || self
                .ignored_substrings
                .iter()
                .any(|substring| url.contains(substring.as_str()))
    }

    /// Returns true if this response is bot-detection noise from an
    /// allow-listed domain and should count as healthy
    pub fn tolerates_response(&self, url: &Url, status: u16) -> bool {
        self.defensive_codes.contains(&status)
            && host_of(url).is_some_and(|host| matches_any(&self.defensive_domains, &host))
    }

    /// Returns true if a fetch error should be treated as healthy
    pub fn suppresses_error(&self, message: &str) -> bool {
        self.suppressed_errors
            .iter()
            .any(|marker| message.contains(marker.as_str()))
    }

    /// Returns true if an error only reflects connection-pool saturation
    pub fn is_saturation_artifact(&self, message: &str) -> bool {
        self.saturation_markers
            .iter()
            .any(|marker| message.contains(marker.as_str()))
    }

    /// Judges the final outcome of a link check
    pub fn assess(&self, outcome: &LinkOutcome) -> Verdict {
        match outcome {
            LinkOutcome::Error { message, .. } if self.is_saturation_artifact(message) => {
                Verdict::Saturated
            }
            LinkOutcome::Error { message, .. } => {
                Verdict::Broken(Breakage::Error(error_label(message)))
            }
            LinkOutcome::Status(code) if *code >= 400 && *code != METHOD_NOT_ALLOWED => {
                Verdict::Broken(Breakage::Status(*code))
            }
            LinkOutcome::Status(_) => Verdict::Healthy,
        }
    }
}

/// Shortens an error description to its first two `:`-separated segments
///
/// The segments are concatenated without the separator, so
/// `"Invalid URL scheme: ftp"` becomes `"Invalid URL scheme ftp"`.
pub fn error_label(message: &str) -> String {
    message.split(':').take(2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FailureKind;

    fn policy() -> LinkPolicy {
        LinkPolicy::new(&PolicyConfig::default())
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_ignored_extension() {
        let policy = policy();
        assert!(policy.is_ignored("https://docs.example.com/stable/tutorial.ipynb"));
        assert!(!policy.is_ignored("https://docs.example.com/stable/ipynb.html"));
    }

    #[test]
    fn test_ignored_substrings() {
        let policy = policy();
        assert!(policy.is_ignored("https://twitter.com/someone"));
        assert!(policy.is_ignored("https://www.kaggle.com/competitions"));
        assert!(policy.is_ignored("https://anaconda.org/conda-forge/autogluon"));
        assert!(!policy.is_ignored("https://anaconda.org/other/autogluon"));
    }

    #[test]
    fn test_defensive_403_is_tolerated_on_allow_listed_domain() {
        let policy = policy();
        assert!(policy.tolerates_response(&url("https://doi.org/10.1000/1"), 403));
        assert!(policy.tolerates_response(&url("https://www.sciencedirect.com/a"), 302));
        assert!(policy.tolerates_response(&url("https://openai.com/blog"), 308));
    }

    #[test]
    fn test_defensive_codes_only() {
        let policy = policy();
        assert!(!policy.tolerates_response(&url("https://doi.org/10.1000/1"), 404));
        assert!(!policy.tolerates_response(&url("https://doi.org/10.1000/1"), 500));
    }

    #[test]
    fn test_403_elsewhere_is_not_tolerated() {
        let policy = policy();
        assert!(!policy.tolerates_response(&url("https://example.com/page"), 403));
        assert!(!policy.tolerates_response(&url("https://notdoi.org/page"), 403));
    }

    #[test]
    fn test_suppressed_errors() {
        let policy = policy();
        assert!(policy.suppresses_error(
            "error sending request: dns error: failed to lookup address information: nodename nor servname provided, or not known"
        ));
        assert!(policy.suppresses_error("connection error: Connection reset by peer (os error 54)"));
        assert!(!policy.suppresses_error("error trying to connect: tcp connect error: Connection refused"));
    }

    #[test]
    fn test_assess_status_codes() {
        let policy = policy();
        assert_eq!(policy.assess(&LinkOutcome::Status(200)), Verdict::Healthy);
        assert_eq!(policy.assess(&LinkOutcome::Status(0)), Verdict::Healthy);
        assert_eq!(policy.assess(&LinkOutcome::Status(399)), Verdict::Healthy);
        assert_eq!(policy.assess(&LinkOutcome::Status(405)), Verdict::Healthy);
        assert_eq!(
            policy.assess(&LinkOutcome::Status(404)),
            Verdict::Broken(Breakage::Status(404))
        );
        assert_eq!(
            policy.assess(&LinkOutcome::Status(503)),
            Verdict::Broken(Breakage::Status(503))
        );
    }

    #[test]
    fn test_assess_errors() {
        let policy = policy();
        let outcome = LinkOutcome::error(FailureKind::InvalidScheme, "Invalid URL scheme: ftp");
        assert_eq!(
            policy.assess(&outcome),
            Verdict::Broken(Breakage::Error("Invalid URL scheme ftp".to_string()))
        );

        let outcome = LinkOutcome::error(
            FailureKind::Connect,
            "HTTPSConnectionPool(host='x'): Max retries exceeded",
        );
        assert_eq!(policy.assess(&outcome), Verdict::Saturated);
    }

    #[test]
    fn test_error_label() {
        assert_eq!(
            error_label("error sending request: client error (Connect): tcp connect error: Connection refused"),
            "error sending request client error (Connect)"
        );
        assert_eq!(error_label("operation timed out"), "operation timed out");
        assert_eq!(error_label(""), "");
    }
}
