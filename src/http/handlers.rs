use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::response::{not_found, projection};
use crate::http::server::AppState;
use crate::session::Viewer;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /{username}`: the portfolio page data.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    viewer: Viewer,
) -> Response {
    match state.resolver.resolve(&username, &viewer).await {
        Ok(profile) => {
            let owner_view = profile.owner_preview.is_some();
            projection(profile, owner_view)
        }
        Err(e) => e.into_response(),
    }
}

/// `GET /{username}/gallery`: visible photos only, in display order.
pub async fn gallery(
    State(state): State<AppState>,
    Path(username): Path<String>,
    viewer: Viewer,
) -> Response {
    match state.resolver.resolve(&username, &viewer).await {
        Ok(profile) => {
            let owner_view = profile.owner_preview.is_some();
            projection(profile.photos, owner_view)
        }
        Err(e) => e.into_response(),
    }
}

/// `GET /{username}/comp-card`
pub async fn comp_card(
    State(state): State<AppState>,
    Path(username): Path<String>,
    viewer: Viewer,
) -> Response {
    match state.resolver.comp_card(&username, &viewer).await {
        // Signed-in requests may be owner previews; keep them out of shared caches.
        Ok(card) => projection(card, viewer != Viewer::Anonymous),
        Err(e) => e.into_response(),
    }
}

pub async fn fallback() -> Response {
    not_found()
}
