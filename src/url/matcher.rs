/// Checks if a host matches a domain pattern
///
/// Two kinds of patterns are supported:
/// 1. Exact match: "doi.org" matches only "doi.org"
/// 2. Wildcard match: "*.doi.org" matches "doi.org" itself and any subdomain
///    such as "dx.doi.org"
///
/// Matching is case-sensitive; hosts are lowercased before they get here.
///
/// # Examples
///
/// ```
/// use docsweep::url::matches_wildcard;
///
/// assert!(matches_wildcard("doi.org", "doi.org"));
/// assert!(!matches_wildcard("doi.org", "dx.doi.org"));
///
/// assert!(matches_wildcard("*.doi.org", "doi.org"));
/// assert!(matches_wildcard("*.doi.org", "dx.doi.org"));
/// assert!(!matches_wildcard("*.doi.org", "notdoi.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

/// Returns true if the host matches any of the patterns
pub fn matches_any<S: AsRef<str>>(patterns: &[S], candidate: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| matches_wildcard(pattern.as_ref(), candidate))
}
