/// Link check outcomes
///
/// Every status check resolves to one of these values; failures are data, not
/// errors, so one bad URL can never abort a batch.
use std::fmt;

/// Classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The request did not complete within its timeout
    Timeout,

    /// Host name could not be resolved
    Dns,

    /// Connection refused/reset, or the request failed in transit
    Connect,

    /// The URL uses a scheme other than http or https
    InvalidScheme,

    /// Anything else (unparseable URL, redirect loop, panicked task, ...)
    Other,
}

impl FailureKind {
    /// Returns true for failure classes worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Dns | Self::Connect)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Timeout => "timeout",
            Self::Dns => "dns",
            Self::Connect => "connect",
            Self::InvalidScheme => "invalid-scheme",
            Self::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// Result of checking a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// An HTTP status code, possibly remapped by policy.
    /// `0` marks an ignored URL that was never fetched.
    Status(u16),

    /// A classified failure with its textual description
    Error { kind: FailureKind, message: String },
}

impl LinkOutcome {
    /// Builds an error outcome
    pub fn error(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if a retry could change this outcome
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status(_) => false,
            Self::Error { kind, .. } => kind.is_transient(),
        }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{}", code),
            Self::Error { message, .. } => write!(f, "{}", message),
        }
    }
}

/// A checked URL together with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub url: String,
    pub outcome: LinkOutcome,
}

impl LinkStatus {
    pub fn new(url: impl Into<String>, outcome: LinkOutcome) -> Self {
        Self {
            url: url.into(),
            outcome,
        }
    }
}
