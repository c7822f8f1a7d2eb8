use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo_types::User;

/// Active user behind a valid, unexpired `Authorization: Bearer` token.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".into()))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("invalid auth scheme".into()))?;

        let claims = state.auth.keys().parse(token)?;
        if claims.is_expired() {
            warn!(user_id = %claims.user_id, "expired token");
            return Err(AppError::InvalidToken("token expired".into()));
        }

        let user = state
            .users
            .get_user_by_id(claims.user_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::Unauthorized("user not found".into()),
                other => other,
            })?;
        Ok(AuthUser(user))
    }
}
