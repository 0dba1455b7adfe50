//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portfolio edge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::validation::ValidationError;
use crate::routing::host::normalize_host;

/// Root configuration for the portfolio edge service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Tenant domain settings used by the hostname classifier.
    pub domain: DomainConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Profile store settings.
    pub store: StoreConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Tenant domain configuration.
///
/// `base_domain` wins when set. Otherwise the base domain is the host of
/// `site_url` with a leading `www.` removed.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DomainConfig {
    /// Base domain for tenant subdomains (e.g., "example.com").
    pub base_domain: Option<String>,

    /// Canonical main-domain URL (e.g., "https://www.example.com").
    pub site_url: Option<String>,

    /// Accept `{username}.localhost` hosts as tenant domains.
    pub local_development: bool,
}

impl DomainConfig {
    /// The effective base domain, lower-cased and without port.
    ///
    /// In local development an unset domain falls back to `localhost`.
    pub fn resolve_base_domain(&self) -> Result<String, ValidationError> {
        if let Some(domain) = non_blank(self.base_domain.as_deref()) {
            // A bare host, optionally with a port. URLs are rejected rather than
            // being cut down to their scheme by port stripping.
            if domain.contains("://")
                || domain.contains(['/', '@'])
                || domain.contains(char::is_whitespace)
            {
                return Err(ValidationError::InvalidBaseDomain(domain.to_string()));
            }
            return Ok(normalize_host(domain));
        }

        let Some(site_url) = non_blank(self.site_url.as_deref()) else {
            if self.local_development {
                return Ok("localhost".to_string());
            }
            return Err(ValidationError::MissingBaseDomain);
        };

        let host = Url::parse(site_url)
            .ok()
            .and_then(|url| url.host_str().map(normalize_host))
            .ok_or_else(|| ValidationError::InvalidSiteUrl(site_url.to_string()))?;

        Ok(match host.strip_prefix("www.") {
            Some(rest) => rest.to_string(),
            None => host,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 15,
            shutdown_grace_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Profile store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON fixture of profiles, photos and sessions loaded at startup.
    pub seed_path: Option<String>,
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: PortfolioConfig = toml::from_str(
            r#"
            [domain]
            base_domain = "example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.domain.base_domain.as_deref(), Some("example.com"));
        assert!(!config.domain.local_development);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.timeouts.request_secs, 15);
        assert!(config.store.seed_path.is_none());
    }

    #[test]
    fn test_base_domain_precedence() {
        let domain = DomainConfig {
            base_domain: Some("Folio.Example.com".into()),
            site_url: Some("https://other.com".into()),
            local_development: false,
        };
        assert_eq!(domain.resolve_base_domain().unwrap(), "folio.example.com");
    }

    #[test]
    fn test_base_domain_must_be_a_bare_host() {
        for value in ["https://example.com", "example.com/app", "user@example.com", "exa mple.com"] {
            let domain = DomainConfig {
                base_domain: Some(value.into()),
                ..DomainConfig::default()
            };
            assert_eq!(
                domain.resolve_base_domain(),
                Err(ValidationError::InvalidBaseDomain(value.into())),
                "{value}"
            );
        }

        let domain = DomainConfig {
            base_domain: Some("Example.com:8080".into()),
            ..DomainConfig::default()
        };
        assert_eq!(domain.resolve_base_domain().unwrap(), "example.com");
    }

    #[test]
    fn test_base_domain_from_site_url() {
        let domain = DomainConfig {
            base_domain: None,
            site_url: Some("https://www.example.com:8443/welcome".into()),
            local_development: false,
        };
        assert_eq!(domain.resolve_base_domain().unwrap(), "example.com");

        let domain = DomainConfig {
            site_url: Some("not a url".into()),
            ..DomainConfig::default()
        };
        assert_eq!(
            domain.resolve_base_domain(),
            Err(ValidationError::InvalidSiteUrl("not a url".into()))
        );
    }

    #[test]
    fn test_local_development_defaults_to_localhost() {
        let domain = DomainConfig {
            local_development: true,
            ..DomainConfig::default()
        };
        assert_eq!(domain.resolve_base_domain().unwrap(), "localhost");
    }
}
