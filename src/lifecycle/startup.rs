//! Startup orchestration.
//!
//! # Responsibilities
//! - Seed the stores
//! - Build the HTTP server from validated configuration
//! - Bind the listener last, so traffic only arrives when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::schema::StoreConfig;
use crate::config::{PortfolioConfig, ValidationError};
use crate::http::HttpServer;
use crate::profiles::{InMemoryProfileStore, LoggingObjectStorage, Seed, StoreError};
use crate::session::InMemorySessionStore;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("failed to seed stores: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// In-memory stores, optionally seeded from a fixture.
pub struct Stores {
    pub profiles: Arc<InMemoryProfileStore>,
    pub sessions: Arc<InMemorySessionStore>,
}

pub fn load_stores(config: &StoreConfig) -> Result<Stores, StoreError> {
    let Some(path) = config.seed_path.as_deref() else {
        tracing::warn!("No seed file configured, starting with empty stores");
        return Ok(Stores {
            profiles: Arc::new(InMemoryProfileStore::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
        });
    };

    let seed = Seed::from_file(Path::new(path))?;
    let profiles = InMemoryProfileStore::from_seed(&seed)?;
    let sessions = InMemorySessionStore::new();
    for session in &seed.sessions {
        sessions.insert(session.token.clone(), session.profile_id);
    }

    tracing::info!(
        path = %path,
        profiles = seed.profiles.len(),
        photos = seed.photos.len(),
        sessions = seed.sessions.len(),
        "Stores seeded"
    );

    Ok(Stores {
        profiles: Arc::new(profiles),
        sessions: Arc::new(sessions),
    })
}

/// Seed stores, build the server and bind its listener.
pub async fn start(config: PortfolioConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let stores = load_stores(&config.store)?;
    let address = config.listener.bind_address.clone();

    let server = HttpServer::new(
        config,
        stores.profiles,
        stores.sessions,
        Arc::new(LoggingObjectStorage),
    )?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((server, listener))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use uuid::Uuid;

    #[test]
    fn test_load_stores_without_seed() {
        let stores = load_stores(&StoreConfig::default()).unwrap();
        assert!(stores.sessions.is_empty());
    }

    #[test]
    fn test_load_stores_from_seed() {
        let id = Uuid::new_v4();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"profiles":[{{"id":"{id}","username":"jane","is_public":true}}],
                "sessions":[{{"token":"t1","profile_id":"{id}"}}]}}"#
        )
        .unwrap();

        let config = StoreConfig {
            seed_path: Some(file.path().display().to_string()),
        };
        let stores = load_stores(&config).unwrap();
        assert_eq!(stores.sessions.len(), 1);
    }

    #[test]
    fn test_demo_seed_loads() {
        let config = StoreConfig {
            seed_path: Some(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/seed.json").into()),
        };
        let stores = load_stores(&config).unwrap();
        assert_eq!(stores.sessions.len(), 2);
    }

    #[test]
    fn test_missing_seed_file_fails() {
        let config = StoreConfig {
            seed_path: Some("/nonexistent/seed.json".into()),
        };
        assert!(load_stores(&config).is_err());
    }

    #[tokio::test]
    async fn test_start_rejects_missing_domain() {
        let config = PortfolioConfig::default();
        assert!(matches!(start(config).await, Err(StartupError::Config(_))));
    }
}
