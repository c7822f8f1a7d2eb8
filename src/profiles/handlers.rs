use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathId};
use crate::profiles::dto::ProfileRequest;
use crate::profiles::repo_types::Profile;
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(create_profile))
        .route(
            "/profile/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    let user_id = payload.require_user_id()?;
    let profile = Profile::new(user_id, payload.into_details());
    let created = state.profiles.create_profile(profile).await?;
    info!(user_id = %user_id, profile_id = %created.id, "POST /profile");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    PathId(user_id): PathId,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.profiles.get_profile(user_id).await?))
}

/// The body `user_id` is required and must name the same owner as the path.
#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    PathId(user_id): PathId,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> AppResult<Json<Profile>> {
    let body_user_id = payload.require_user_id()?;
    if body_user_id != user_id {
        warn!(%user_id, %body_user_id, "profile owner mismatch");
        return Err(AppError::bad_request("user_id does not match the profile path"));
    }

    let updated = state
        .profiles
        .update_profile(user_id, payload.into_details())
        .await?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    PathId(user_id): PathId,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.profiles.soft_delete_profile(user_id).await?))
}
