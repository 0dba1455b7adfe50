//! Session middleware.
//! Resolves the viewer for every request; never rejects.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::session::Viewer;

/// Cookie carrying the session token when no bearer token is sent.
pub const SESSION_COOKIE: &str = "portfolio_session";

/// Extract the session token: `Authorization: Bearer` first, then the
/// session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.trim())
            .filter(|t| !t.is_empty())
    })
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = session_token(req.headers()).map(str::to_owned);
    let viewer = match token {
        Some(token) => match state.sessions.profile_for_token(&token).await {
            Some(profile_id) => Viewer::Signed { profile_id },
            None => {
                tracing::debug!("Unknown session token, treating request as anonymous");
                Viewer::Anonymous
            }
        },
        None => Viewer::Anonymous,
    };

    req.extensions_mut().insert(viewer);
    next.run(req).await
}
