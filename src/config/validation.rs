use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, PolicyConfig, RetryConfig, Target,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_policy_config(&config.policy)?;
    validate_output_config(&config.output)?;
    for target in &config.targets {
        validate_target(target)?;
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(concurrency) = config.concurrency {
        if !(1..=256).contains(&concurrency) {
            return Err(ConfigError::Validation(format!(
                "concurrency must be between 1 and 256, got {}",
                concurrency
            )));
        }
    }

    if config.discovery_timeout == 0 {
        return Err(ConfigError::Validation(
            "discovery-timeout must be >= 1s".to_string(),
        ));
    }

    if config.validation_timeout == 0 {
        return Err(ConfigError::Validation(
            "validation-timeout must be >= 1s".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.multiplier <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "multiplier must be positive, got {}",
            config.multiplier
        )));
    }

    if config.min_wait < 0.0 || config.min_wait > config.max_wait {
        return Err(ConfigError::Validation(format!(
            "min-wait must be between 0 and max-wait, got {} (max-wait {})",
            config.min_wait, config.max_wait
        )));
    }

    Ok(())
}

/// Validates link exception rules
fn validate_policy_config(config: &PolicyConfig) -> Result<(), ConfigError> {
    for pattern in &config.defensive_domains {
        validate_domain_pattern(pattern)?;
    }

    if let Some(code) = config
        .defensive_codes
        .iter()
        .find(|code| !(100..=599).contains(*code))
    {
        return Err(ConfigError::Validation(format!(
            "defensive-codes must be HTTP status codes, got {}",
            code
        )));
    }

    let empty_marker = config
        .ignored_substrings
        .iter()
        .chain(&config.ignored_extensions)
        .chain(&config.suppressed_errors)
        .chain(&config.saturation_markers)
        .any(|marker| marker.is_empty());
    if empty_marker {
        // An empty marker would match every URL or every error
        return Err(ConfigError::Validation(
            "policy markers cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.file_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "file-prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a crawl target
fn validate_target(target: &Target) -> Result<(), ConfigError> {
    let url = Url::parse(&target.root_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid root URL '{}': {}", target.root_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Root URL '{}' must use HTTP or HTTPS",
            target.root_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Root URL '{}' has no host",
            target.root_url
        )));
    }

    validate_label(&target.label)
}

/// Labels end up in file names
fn validate_label(label: &str) -> Result<(), ConfigError> {
    if label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target label cannot be empty".to_string(),
        ));
    }

    if label.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "target label '{}' cannot contain path separators",
            label
        )));
    }

    Ok(())
}

/// Validates a defensive-domain pattern
///
/// A pattern is a host name, optionally prefixed with `*.`. Patterns are
/// compared label by label against lowercased hosts, so every label must be
/// non-empty and made of ASCII letters, digits and inner hyphens.
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    let host = pattern.strip_prefix("*.").unwrap_or(pattern);

    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain pattern '{}' has no host",
            pattern
        )));
    }

    for label in host.split('.') {
        let valid = !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

        if !valid {
            return Err(ConfigError::InvalidPattern(format!(
                "Domain pattern '{}' has an invalid label '{}'",
                pattern, label
            )));
        }
    }

    Ok(())
}
