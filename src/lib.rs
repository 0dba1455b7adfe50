//! Portfolio edge: tenant subdomain routing and public profile resolution.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request (Host: jane.example.com, path /gallery)
//!         │
//!         ▼
//!     ┌────────────┐   ┌──────────────────┐   ┌───────────┐
//!     │  routing   │──▶│  http (router)   │──▶│  session  │
//!     │ classifier │   │  /jane/gallery   │   │  Viewer   │
//!     │ + rewriter │   └──────────────────┘   └─────┬─────┘
//!     └────────────┘                                │
//!                                                   ▼
//!                     ┌───────────────────────────────────┐
//!                     │ profiles: resolver / catalog      │
//!                     │   → ProfileStore (privacy gate,   │
//!                     │     visible photos by sort_order) │
//!                     └───────────────────────────────────┘
//!
//!     Cross-cutting: config (TOML + env, hot reload), observability
//!     (tracing, metrics), lifecycle (startup, signals, shutdown)
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod profiles;
pub mod routing;
pub mod session;

pub use config::schema::PortfolioConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
