//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Resolve the effective base domain and check it is a usable hostname
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortfolioConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::PortfolioConfig;
use crate::routing::host::{is_valid_label, split_labels};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no base domain: set domain.base_domain, PORTFOLIO_DOMAIN or SITE_URL")]
    MissingBaseDomain,

    #[error("invalid site_url '{0}'")]
    InvalidSiteUrl(String),

    #[error("invalid base domain '{0}'")]
    InvalidBaseDomain(String),

    #[error("invalid {field} address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &PortfolioConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.domain.resolve_base_domain() {
        Ok(domain) => {
            let labels = split_labels(&domain);
            if labels.is_empty() || !labels.iter().all(|l| is_valid_label(l)) {
                errors.push(ValidationError::InvalidBaseDomain(domain));
            }
        }
        Err(e) => errors.push(e),
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
