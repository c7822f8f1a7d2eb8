use serde::Deserialize;

use crate::error::AppResult;
use crate::users::repo_types::{User, UserPatch};
use crate::validation;

/// Request body for `POST /users` and `PUT /users/{id}`.
///
/// Every field is optional at the JSON level so that create can report
/// which one is missing and update can tell "absent" from "present".
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Vec<String>>,
    pub driver: Option<bool>,
}

/// Validated create input. The password is still plain text; the handler
/// hashes it before the user reaches the service.
#[derive(Debug)]
pub struct NewUserInput {
    pub user: User,
    pub password: String,
}

/// Validated update input.
#[derive(Debug)]
pub struct UserUpdateInput {
    pub patch: UserPatch,
    pub password: Option<String>,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> AppResult<NewUserInput> {
        let password = validation::required_raw("password", self.password)?;
        let first_name = validation::required("first_name", self.first_name)?;
        let last_name = validation::required("last_name", self.last_name)?;
        let email = validation::required_email(self.email)?;

        let mut user = User::new(first_name, last_name, email);
        user.role = self.role.unwrap_or_default();
        user.driver = self.driver.unwrap_or(false);
        Ok(NewUserInput { user, password })
    }

    /// Fields the client sent become part of the patch, the rest stay
    /// untouched in the store.
    pub fn into_update(self) -> AppResult<UserUpdateInput> {
        let first_name = self
            .first_name
            .map(|v| validation::required("first_name", Some(v)))
            .transpose()?;
        let last_name = self
            .last_name
            .map(|v| validation::required("last_name", Some(v)))
            .transpose()?;
        let email = self.email.map(validation::email).transpose()?;
        let password = self
            .password
            .map(|v| validation::required_raw("password", Some(v)))
            .transpose()?;

        Ok(UserUpdateInput {
            patch: UserPatch {
                first_name,
                last_name,
                email,
                password_hash: None,
                role: self.role,
                driver: self.driver,
                is_active: None,
                deleted_at: None,
            },
            password,
        })
    }
}
