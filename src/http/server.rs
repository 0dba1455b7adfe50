//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, request ID, tenant rewrite, sessions, limits)
//! - Bind server to listener
//! - Apply configuration reloads to the host classifier
//!
//! # Layer order
//! ```text
//! SetRequestId → Trace → PropagateRequestId → tenant rewrite
//!     → [route match] → Timeout → BodyLimit → session → handler
//! ```
//! The rewrite sits on an outer router so it runs before route matching.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{PortfolioConfig, ValidationError};
use crate::http::{api, handlers, request};
use crate::profiles::{ObjectStorage, PhotoCatalog, ProfileResolver, ProfileStore};
use crate::routing::classifier::HostClassifier;
use crate::routing::rewriter::rewrite_tenant_host;
use crate::session::{session_middleware, SessionStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<ArcSwap<HostClassifier>>,
    pub profiles: Arc<dyn ProfileStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub resolver: ProfileResolver,
    pub catalog: PhotoCatalog,
}

impl AppState {
    pub fn new(
        classifier: HostClassifier,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn SessionStore>,
        objects: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            classifier: Arc::new(ArcSwap::from_pointee(classifier)),
            resolver: ProfileResolver::new(profiles.clone()),
            catalog: PhotoCatalog::new(profiles.clone(), objects),
            profiles,
            sessions,
        }
    }

    /// Swap in a classifier built from `config`. The old one stays on error.
    pub fn apply_config(&self, config: &PortfolioConfig) -> Result<(), ValidationError> {
        let classifier = HostClassifier::from_config(&config.domain)?;
        tracing::info!(
            base_domain = %classifier.base_domain(),
            local_development = classifier.local_development(),
            "Host classifier updated"
        );
        self.classifier.store(Arc::new(classifier));
        Ok(())
    }
}

/// HTTP server for the portfolio edge.
pub struct HttpServer {
    router: Router,
    config: PortfolioConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server. Fails if no base domain can be derived from `config`.
    pub fn new(
        config: PortfolioConfig,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn SessionStore>,
        objects: Arc<dyn ObjectStorage>,
    ) -> Result<Self, ValidationError> {
        let classifier = HostClassifier::from_config(&config.domain)?;
        let state = AppState::new(classifier, profiles, sessions, objects);
        let router = build_router(&config, state.clone());

        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<PortfolioConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_domain = %self.state.classifier.load().base_domain(),
            "HTTP server starting"
        );

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.apply_config(&config) {
                    tracing::warn!(error = %e, "Rejected config update, keeping current classifier");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &PortfolioConfig, state: AppState) -> Router {
    let routes = Router::new()
        .route("/healthz", get(handlers::health))
        .route("/{username}", get(handlers::public_profile))
        .route("/{username}/gallery", get(handlers::gallery))
        .route("/{username}/comp-card", get(handlers::comp_card))
        .merge(api::setup_api_router())
        .fallback(handlers::fallback)
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .with_state(state.clone());

    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(state, rewrite_tenant_host))
        .layer(request::propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request::request_span))
        .layer(request::set_request_id_layer())
}
