//! Owner API under `/api`.
//!
//! Every handler takes [`SignedIn`], so anonymous requests are rejected with
//! `401` before any store access.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::response::{bad_request, not_found};
use crate::http::server::AppState;
use crate::profiles::onboarding::{next_step, NextStep};
use crate::profiles::username::check_availability;
use crate::profiles::{Photo, Profile};
use crate::session::SignedIn;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub profile: Profile,
    pub next_step: NextStep,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub photo_ids: Vec<Uuid>,
}

/// Absent fields are left unchanged. An empty caption clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePhotoRequest {
    #[serde(default)]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub caption: Option<String>,
}

pub fn setup_api_router() -> Router<AppState> {
    Router::new()
        .route("/api/me", get(me))
        .route("/api/usernames/{username}", get(username_availability))
        .route("/api/photos", get(list_photos))
        .route("/api/photos/reorder", post(reorder_photos))
        .route("/api/photos/{id}", patch(update_photo).delete(delete_photo))
}

pub async fn me(State(state): State<AppState>, SignedIn(profile_id): SignedIn) -> Response {
    match state.profiles.profile_by_id(profile_id).await {
        Ok(Some(profile)) => Json(MeResponse {
            next_step: next_step(&profile),
            profile,
        })
        .into_response(),
        // Session outlived its profile.
        Ok(None) => not_found(),
        Err(e) => e.into_response(),
    }
}

pub async fn username_availability(
    State(state): State<AppState>,
    SignedIn(_): SignedIn,
    Path(username): Path<String>,
) -> Response {
    match check_availability(state.profiles.as_ref(), &username).await {
        Ok(availability) => Json(availability).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_photos(
    State(state): State<AppState>,
    SignedIn(owner): SignedIn,
) -> Result<Json<Vec<Photo>>, Response> {
    state
        .catalog
        .list(owner)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

pub async fn reorder_photos(
    State(state): State<AppState>,
    SignedIn(owner): SignedIn,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Vec<Photo>>, Response> {
    state
        .catalog
        .reorder(owner, &request.photo_ids)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

pub async fn update_photo(
    State(state): State<AppState>,
    SignedIn(owner): SignedIn,
    Path(photo_id): Path<Uuid>,
    Json(request): Json<UpdatePhotoRequest>,
) -> Response {
    if request.is_visible.is_none() && request.caption.is_none() {
        return bad_request("nothing to update");
    }

    match state
        .catalog
        .update_photo(owner, photo_id, request.is_visible, request.caption.as_deref())
        .await
    {
        Ok(photo) => Json(photo).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_photo(
    State(state): State<AppState>,
    SignedIn(owner): SignedIn,
    Path(photo_id): Path<Uuid>,
) -> Response {
    match state.catalog.delete(owner, photo_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
