//! Tenant request rewriting.
//!
//! # Responsibilities
//! - Classify every inbound request by its host
//! - Rewrite tenant requests to the canonical `/{username}` route
//! - Mark rewritten requests (header + extension) for downstream handlers
//!
//! # Design Decisions
//! - Rewrite, never redirect: the client keeps its host and address bar
//! - Query strings survive the rewrite
//! - The marker header is stripped from every inbound request first, so it
//!   can only come from this middleware

use std::str::FromStr;

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::PathAndQuery, HeaderName, HeaderValue, Request, Uri},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::classifier::HostClass;

/// Header carrying the tenant username resolved from the host.
pub const X_PORTFOLIO_USERNAME: HeaderName = HeaderName::from_static("x-portfolio-username");

/// Request extension set on rewritten tenant requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRoute {
    pub username: String,
    /// Path the client actually requested.
    pub original_path: String,
}

/// Canonical profile path for a tenant request.
///
/// `/` (or an empty path) collapses to `/{username}`; anything else is
/// appended.
pub fn canonical_path(username: &str, path: &str) -> String {
    match path {
        "" | "/" => format!("/{}", username),
        p if p.starts_with('/') => format!("/{}{}", username, p),
        p => format!("/{}/{}", username, p),
    }
}

/// Rewrite `uri` onto the canonical route, keeping scheme, authority and
/// query. Returns `None` if the result is not a valid URI.
pub fn rewrite_uri(uri: &Uri, username: &str) -> Option<Uri> {
    let mut target = canonical_path(username, uri.path());
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::from_str(&target).ok()?);
    Uri::from_parts(parts).ok()
}

/// Host of the request: the `Host` header, else the URI authority
/// (HTTP/2 requests carry it there).
pub fn request_host<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
}

/// Middleware applied in front of the router.
pub async fn rewrite_tenant_host(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    req.headers_mut().remove(&X_PORTFOLIO_USERNAME);

    let class = state
        .classifier
        .load()
        .classify(request_host(&req).unwrap_or_default());
    metrics::record_host_class(class.kind());

    let HostClass::TenantDomain { username } = class else {
        return next.run(req).await;
    };

    let (Some(uri), Ok(marker)) = (
        rewrite_uri(req.uri(), &username),
        HeaderValue::from_str(&username),
    ) else {
        tracing::warn!(
            username = %username,
            uri = %req.uri(),
            "Tenant rewrite produced an invalid URI, serving as main domain"
        );
        return next.run(req).await;
    };

    let original_path = req.uri().path().to_string();
    tracing::debug!(
        username = %username,
        from = %original_path,
        to = %uri.path(),
        "Rewriting tenant request"
    );

    *req.uri_mut() = uri;
    req.headers_mut().insert(X_PORTFOLIO_USERNAME, marker.clone());
    req.extensions_mut().insert(TenantRoute {
        username,
        original_path,
    });

    let mut response = next.run(req).await;
    response.headers_mut().insert(X_PORTFOLIO_USERNAME, marker);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_path() {
        assert_eq!(canonical_path("jane", "/"), "/jane");
        assert_eq!(canonical_path("jane", ""), "/jane");
        assert_eq!(canonical_path("jane", "/gallery"), "/jane/gallery");
        assert_eq!(canonical_path("jane", "/gallery/"), "/jane/gallery/");
        assert_eq!(canonical_path("jane", "comp-card"), "/jane/comp-card");
    }

    #[test]
    fn test_rewrite_uri_keeps_query_and_authority() {
        let uri: Uri = "http://jane.example.com/gallery?page=2".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "jane").unwrap();

        assert_eq!(rewritten.path(), "/jane/gallery");
        assert_eq!(rewritten.query(), Some("page=2"));
        assert_eq!(rewritten.host(), Some("jane.example.com"));
    }

    #[test]
    fn test_rewrite_origin_form_uri() {
        let uri: Uri = "/".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "jane").unwrap();
        assert_eq!(rewritten.to_string(), "/jane");
    }

    #[test]
    fn test_request_host_prefers_header() {
        let req = Request::builder()
            .uri("http://authority.example.com/")
            .header("Host", "jane.example.com")
            .body(())
            .unwrap();
        assert_eq!(request_host(&req), Some("jane.example.com"));

        let req = Request::builder()
            .uri("http://authority.example.com/")
            .body(())
            .unwrap();
        assert_eq!(request_host(&req), Some("authority.example.com"));

        let req = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(request_host(&req), None);
    }
}
