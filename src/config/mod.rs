//! Configuration module for Docsweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; missing values fall back to the defaults.
//!
//! # Example
//!
//! ```no_run
//! use docsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docsweep.toml")).unwrap();
//! println!("Retrying up to {} times", config.retry.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HeaderConfig, OutputConfig, PolicyConfig, RetryConfig, Target,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
