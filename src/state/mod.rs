//! State module for link check results
//!
//! # Components
//!
//! - `LinkOutcome`: status code or classified failure of a single check
//! - `FailureKind`: failure classes, and which of them are transient
//! - `LinkStatus`: a URL paired with its outcome

mod outcome;

pub use outcome::{FailureKind, LinkOutcome, LinkStatus};
