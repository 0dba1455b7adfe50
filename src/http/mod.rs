//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, span)
//!     → [routing::rewriter: tenant host → /{username}]
//!     → [session: Viewer]
//!     → handlers.rs (public pages) / api.rs (owner API)
//!     → response.rs (error mapping, cache headers)
//!     → Send to client
//! ```

pub mod api;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
