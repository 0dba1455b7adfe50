//! Hostname parsing helpers.
//!
//! Small pure functions shared by the classifier and config validation.
//! None of them allocate more than the normalized host string.

/// Longest label DNS allows.
const MAX_LABEL_LEN: usize = 63;

/// Strip a `:port` suffix. Bracketed IPv6 literals keep their brackets.
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    match host.find(':') {
        Some(idx) => &host[..idx],
        None => host,
    }
}

/// Trim whitespace, drop the port and one trailing dot, lower-case.
pub fn normalize_host(host: &str) -> String {
    let host = strip_port(host.trim());
    let host = host.strip_suffix('.').unwrap_or(host);
    host.to_ascii_lowercase()
}

/// Split a normalized host into labels. Empty labels are kept so callers
/// can reject hosts like `a..example.com`.
pub fn split_labels(host: &str) -> Vec<&str> {
    if host.is_empty() {
        return Vec::new();
    }
    host.split('.').collect()
}

/// A label usable as a tenant key: 1 to 63 characters of ASCII letters,
/// digits, `-` or `_`, with at least one letter or digit.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        && label.bytes().any(|b| b.is_ascii_alphanumeric())
}
