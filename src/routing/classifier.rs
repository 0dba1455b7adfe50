//! Hostname classification.
//!
//! # Responsibilities
//! - Decide whether a request targets the main domain or a tenant subdomain
//! - Extract the lower-cased username from tenant hosts
//! - Keep reserved subdomains on the main application
//!
//! # Design Decisions
//! - Pure function of the host string and the injected domain settings
//! - Fail closed: anything ambiguous is the main domain
//! - Only a single label in front of the base domain can name a tenant

use crate::config::schema::DomainConfig;
use crate::config::validation::ValidationError;
use crate::routing::host::{is_valid_label, normalize_host, split_labels};

/// Subdomains used by the application itself. Never usernames.
pub const RESERVED_SUBDOMAINS: &[&str] = &[
    "www",
    "api",
    "app",
    "dashboard",
    "admin",
    "mail",
    "ftp",
    "staging",
    "dev",
    "blog",
    "help",
    "support",
    "status",
    "cdn",
    "static",
    "assets",
    "auth",
    "login",
    "signup",
    "billing",
    "docs",
];

const LOCAL_SUFFIX: &str = "localhost";

/// Returns true if `label` (any case) is a reserved subdomain.
pub fn is_reserved(label: &str) -> bool {
    RESERVED_SUBDOMAINS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(label))
}

/// Outcome of classifying a request host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// The main application domain (including anything ambiguous).
    MainDomain,
    /// `{username}.{base-domain}`.
    TenantDomain { username: String },
}

impl HostClass {
    /// The tenant username, if any.
    pub fn username(&self) -> Option<&str> {
        match self {
            HostClass::MainDomain => None,
            HostClass::TenantDomain { username } => Some(username),
        }
    }

    /// Label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HostClass::MainDomain => "main",
            HostClass::TenantDomain { .. } => "tenant",
        }
    }
}

/// Classifies hosts against one base domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostClassifier {
    base_domain: String,
    base_labels: Vec<String>,
    local_development: bool,
}

impl HostClassifier {
    /// Create a classifier for `base_domain`. The domain is normalized the
    /// same way request hosts are.
    pub fn new(base_domain: &str, local_development: bool) -> Self {
        let base_domain = normalize_host(base_domain);
        let base_labels = split_labels(&base_domain)
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            base_domain,
            base_labels,
            local_development,
        }
    }

    /// Build from the domain section of the configuration.
    pub fn from_config(config: &DomainConfig) -> Result<Self, ValidationError> {
        let base_domain = config.resolve_base_domain()?;
        Ok(Self::new(&base_domain, config.local_development))
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn local_development(&self) -> bool {
        self.local_development
    }

    /// Classify a raw `Host` value (port and trailing dot allowed).
    pub fn classify(&self, raw_host: &str) -> HostClass {
        let host = normalize_host(raw_host);
        let labels = split_labels(&host);

        let Some((first, rest)) = labels.split_first() else {
            return HostClass::MainDomain;
        };

        if !self.is_tenant_suffix(rest) {
            return HostClass::MainDomain;
        }

        if !is_valid_label(first) || is_reserved(first) {
            return HostClass::MainDomain;
        }

        HostClass::TenantDomain {
            username: first.to_string(),
        }
    }

    /// True when `rest` (the host minus its first label) is exactly the
    /// base domain, or `localhost` in local development.
    fn is_tenant_suffix(&self, rest: &[&str]) -> bool {
        if self.local_development && rest == [LOCAL_SUFFIX] {
            return true;
        }

        !self.base_labels.is_empty()
            && rest.len() == self.base_labels.len()
            && rest.iter().zip(&self.base_labels).all(|(a, b)| *a == b.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(name: &str) -> HostClass {
        HostClass::TenantDomain {
            username: name.to_string(),
        }
    }

    #[test]
    fn test_base_domain_is_main() {
        let classifier = HostClassifier::new("example.com", false);
        assert_eq!(classifier.classify("example.com"), HostClass::MainDomain);
        assert_eq!(classifier.classify("EXAMPLE.com:443"), HostClass::MainDomain);
    }

    #[test]
    fn test_tenant_subdomain() {
        let classifier = HostClassifier::new("example.com", false);
        assert_eq!(classifier.classify("jane.example.com"), tenant("jane"));
        assert_eq!(classifier.classify("jane.example.com:3000"), tenant("jane"));
        assert_eq!(classifier.classify("jane.example.com."), tenant("jane"));
    }

    #[test]
    fn test_case_insensitive_username() {
        let classifier = HostClassifier::new("example.com", false);
        assert_eq!(
            classifier.classify("JohnDoe.example.com"),
            classifier.classify("johndoe.example.com")
        );
        assert_eq!(classifier.classify("JohnDoe.Example.Com"), tenant("johndoe"));
    }

    #[test]
    fn test_reserved_subdomains_are_main() {
        let classifier = HostClassifier::new("example.com", false);
        for reserved in RESERVED_SUBDOMAINS {
            let host = format!("{}.example.com", reserved);
            assert_eq!(classifier.classify(&host), HostClass::MainDomain, "{}", host);
        }
        assert_eq!(classifier.classify("WWW.example.com"), HostClass::MainDomain);
    }

    #[test]
    fn test_foreign_and_nested_hosts_are_main() {
        let classifier = HostClassifier::new("example.com", false);
        assert_eq!(classifier.classify("jane.other.com"), HostClass::MainDomain);
        assert_eq!(classifier.classify("a.jane.example.com"), HostClass::MainDomain);
        assert_eq!(classifier.classify("janeexample.com"), HostClass::MainDomain);
        assert_eq!(classifier.classify("com"), HostClass::MainDomain);
    }

    #[test]
    fn test_malformed_hosts_fail_closed() {
        let classifier = HostClassifier::new("example.com", false);
        assert_eq!(classifier.classify(""), HostClass::MainDomain);
        assert_eq!(classifier.classify(".example.com"), HostClass::MainDomain);
        assert_eq!(classifier.classify("--.example.com"), HostClass::MainDomain);
        assert_eq!(classifier.classify("ja ne.example.com"), HostClass::MainDomain);
        assert_eq!(classifier.classify("[::1]:3000"), HostClass::MainDomain);
        assert_eq!(classifier.classify("127.0.0.1:3000"), HostClass::MainDomain);
    }

    #[test]
    fn test_single_label_base_domain() {
        let classifier = HostClassifier::new("localhost", false);
        assert_eq!(classifier.classify("localhost:3000"), HostClass::MainDomain);
        assert_eq!(classifier.classify("jane.localhost:3000"), tenant("jane"));
    }

    #[test]
    fn test_local_development_accepts_localhost() {
        let classifier = HostClassifier::new("example.com", true);
        assert_eq!(classifier.classify("studio.localhost:3000"), tenant("studio"));
        assert_eq!(classifier.classify("www.localhost:3000"), HostClass::MainDomain);
        assert_eq!(classifier.classify("localhost:3000"), HostClass::MainDomain);
        assert_eq!(classifier.classify("jane.example.com"), tenant("jane"));

        let production = HostClassifier::new("example.com", false);
        assert_eq!(production.classify("studio.localhost:3000"), HostClass::MainDomain);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = HostClassifier::new("example.com", false);
        for host in ["jane.example.com", "www.example.com", "", "x.y.example.com"] {
            assert_eq!(classifier.classify(host), classifier.classify(host));
        }
    }

    #[test]
    fn test_base_domain_normalized() {
        let classifier = HostClassifier::new("Example.COM:8080", false);
        assert_eq!(classifier.base_domain(), "example.com");
        assert_eq!(classifier.classify("jane.example.com"), tenant("jane"));
    }
}
