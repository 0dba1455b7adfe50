//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host, path)
//!     → rewriter.rs (middleware in front of the router)
//!     → classifier.rs (host → MainDomain | TenantDomain(username))
//!         MainDomain     → request untouched
//!         TenantDomain   → path rewritten to /{username}{path}
//!     → axum Router dispatches on the (possibly rewritten) path
//! ```
//!
//! # Design Decisions
//! - Classifier built from config at startup, swapped atomically on reload
//! - No regex: label splitting and exact comparisons only
//! - Deterministic: same host always classifies the same way

pub mod classifier;
pub mod host;
pub mod rewriter;

pub use classifier::{HostClass, HostClassifier, RESERVED_SUBDOMAINS};
pub use rewriter::{TenantRoute, X_PORTFOLIO_USERNAME};
