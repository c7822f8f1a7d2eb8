use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::password::hash_password;
use crate::error::AppResult;
use crate::extract::{JsonBody, PathId};
use crate::state::AppState;
use crate::users::dto::CreateUserRequest;
use crate::users::repo_types::User;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.get_all_users().await?;
    info!(count = users.len(), "GET /users");
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let input = payload.into_new_user()?;
    let mut user = input.user;
    user.password_hash = hash_password(&input.password)?;

    let created = state.users.create_user(user).await?;
    info!(user_id = %created.id, "POST /users");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.get_user_by_id(id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> AppResult<Json<User>> {
    let input = payload.into_update()?;
    let mut patch = input.patch;
    if let Some(password) = input.password {
        patch.password_hash = Some(hash_password(&password)?);
    }

    let updated = state.users.update_user(id, patch).await?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.soft_delete_user(id).await?))
}
