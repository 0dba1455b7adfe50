//! Response shaping and error mapping.
//!
//! # Design Decisions
//! - Every "not found" is the same response, whatever the cause, so private
//!   profiles cannot be told apart from missing ones
//! - Store outages are 503 with a body that never names the profile
//! - Owner previews are never cached by shared caches

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::profiles::{CatalogError, ResolveError, StoreError};

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let mut response = (status, Json(ErrorBody { error: message })).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// The one not-found response.
pub fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}

pub fn unavailable() -> Response {
    error_response(StatusCode::SERVICE_UNAVAILABLE, "temporarily unavailable")
}

pub fn bad_request(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// JSON body with a cache policy: owner views are private, public
/// projections may be cached briefly.
pub fn projection<T: Serialize>(body: T, owner_view: bool) -> Response {
    let cache = if owner_view {
        "private, no-store"
    } else {
        "public, max-age=60"
    };
    let mut response = Json(body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache));
    // The same URL serves anonymous and owner projections.
    headers.insert(header::VARY, HeaderValue::from_static("Authorization, Cookie"));
    response
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        match self {
            ResolveError::NotFound => not_found(),
            ResolveError::Unavailable(_) => unavailable(),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        match self {
            StoreError::Unavailable(_) => unavailable(),
            other => {
                tracing::error!(error = %other, "Store error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            CatalogError::PhotoNotFound(_) => not_found(),
            CatalogError::InvalidOrder(reason) => bad_request(&reason),
            CatalogError::CaptionTooLong => bad_request(&CatalogError::CaptionTooLong.to_string()),
            CatalogError::Store(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_share_status() {
        assert_eq!(ResolveError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            CatalogError::PhotoNotFound(uuid::Uuid::nil()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let err = ResolveError::Unavailable(StoreError::Unavailable("down".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_projection_cache_policy() {
        let public = projection(serde_json::json!({}), false);
        assert_eq!(public.headers()[header::CACHE_CONTROL], "public, max-age=60");
        assert_eq!(public.headers()[header::VARY], "Authorization, Cookie");

        let owner = projection(serde_json::json!({}), true);
        assert_eq!(owner.headers()[header::CACHE_CONTROL], "private, no-store");
        assert_eq!(owner.headers()[header::VARY], "Authorization, Cookie");
    }
}
