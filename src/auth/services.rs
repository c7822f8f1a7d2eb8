use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::users::repo_types::User;
use crate::users::services::UserDirectory;

/// The only message a failed login ever gets.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.into())
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserDirectory>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, user, password), fields(email = %user.email), err)]
    pub async fn register_user(&self, mut user: User, password: &str) -> AppResult<User> {
        user.password_hash = hash_password(password)?;
        user.is_active = true;

        let created = self.users.create_user(user).await.map_err(|e| match e {
            AppError::BadRequest(msg) => AppError::BadRequest(msg),
            other => AppError::bad_request(format!("error creating user: {other}")),
        })?;
        info!(user_id = %created.id, "user registered");
        Ok(created)
    }

    /// A signed token for the account behind `email`. Unknown email,
    /// disabled account and wrong password all fail the same way.
    #[instrument(skip(self, password), err)]
    pub async fn login_user(&self, email: &str, password: &str) -> AppResult<String> {
        let user = match self.users.get_user_by_email(email).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                warn!("login unknown email");
                return Err(invalid_credentials());
            }
            Err(e) => return Err(e),
        };

        if !user.is_active {
            warn!(user_id = %user.id, "login on disabled account");
            return Err(invalid_credentials());
        }

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = %user.id, "login invalid password");
            return Err(invalid_credentials());
        }

        let token = self.keys.sign(&self.keys.claims_for(&user))?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }
}
