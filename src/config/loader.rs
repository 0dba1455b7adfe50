//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::PortfolioConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<PortfolioConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PortfolioConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay environment variables on top of a parsed configuration.
///
/// `lookup` stands in for `std::env::var` so tests never touch the real
/// process environment.
pub fn apply_env<F>(config: &mut PortfolioConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(domain) = var("PORTFOLIO_DOMAIN") {
        config.domain.base_domain = Some(domain);
    }
    if let Some(site_url) = var("SITE_URL") {
        config.domain.site_url = Some(site_url);
    }
    if let Some(env) = var("APP_ENV").or_else(|| var("NODE_ENV")) {
        config.domain.local_development = env.eq_ignore_ascii_case("development");
    }
    if let Some(bind) = var("PORTFOLIO_BIND") {
        config.listener.bind_address = bind;
    }
}

/// Build the runtime configuration: optional TOML file, then environment
/// overrides, then validation.
pub fn load_from_env(path: Option<&Path>) -> Result<PortfolioConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => PortfolioConfig::default(),
    };

    apply_env(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
