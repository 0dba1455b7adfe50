//! Session resolution.
//!
//! # Data Flow
//! ```text
//! Request (Authorization / Cookie)
//!     → middleware.rs (extract token)
//!     → store.rs (token → profile id)
//!     → Viewer inserted as request extension
//!     → handlers extract Viewer / SignedIn
//! ```
//!
//! # Design Decisions
//! - Authentication itself belongs to the managed auth provider
//! - Unknown or missing tokens are anonymous, not errors
//! - Only `/api` handlers require a signed-in viewer

pub mod middleware;
pub mod store;

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::profiles::types::Profile;

pub use middleware::{session_middleware, SESSION_COOKIE};
pub use store::{InMemorySessionStore, SessionStore};

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Signed { profile_id: Uuid },
}

impl Viewer {
    pub fn profile_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Signed { profile_id } => Some(*profile_id),
        }
    }

    /// True if the viewer is the owner of `profile`.
    pub fn owns(&self, profile: &Profile) -> bool {
        self.profile_id() == Some(profile.id)
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Viewer>().copied().unwrap_or_default())
    }
}

/// Extractor for handlers that need a signed-in viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedIn(pub Uuid);

impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Viewer>().and_then(Viewer::profile_id) {
            Some(id) => Ok(SignedIn(id)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "authentication required" })),
            )
                .into_response()),
        }
    }
}
