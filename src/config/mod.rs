//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (overlay PORTFOLIO_DOMAIN / SITE_URL / APP_ENV)
//!     → validation.rs (semantic checks)
//!     → PortfolioConfig (validated, immutable)
//!     → HostClassifier built from it, shared via ArcSwap
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the classifier
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Environment lookups are injected, never read from module globals

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::ConfigError;
pub use schema::PortfolioConfig;
pub use schema::{DomainConfig, ListenerConfig, ObservabilityConfig};
pub use validation::ValidationError;
