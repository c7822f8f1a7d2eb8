use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::users::repo_types::User;
use crate::validation;

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub driver: Option<bool>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Validated login credentials.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// The user to create and the plain password to hash for it.
    pub fn into_registration(self) -> AppResult<(User, String)> {
        let first_name = validation::required("first_name", self.first_name)?;
        let last_name = validation::required("last_name", self.last_name)?;
        let email = validation::required_email(self.email)?;
        let password = validation::required_raw("password", self.password)?;

        let mut user = User::new(first_name, last_name, email);
        user.driver = self.driver.unwrap_or(false);
        Ok((user, password))
    }
}

impl LoginRequest {
    pub fn into_credentials(self) -> AppResult<Credentials> {
        let email = validation::required("email", self.email)?;
        let password = validation::required_raw("password", self.password)?;
        Ok(Credentials { email, password })
    }
}
