use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::profiles::repo_types::Profile;

/// Role every user has when none is stored.
pub const DEFAULT_ROLE: &str = "user";

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 PHC string, never exposed in JSON
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,
    pub driver: bool,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(
        rename = "deletedAt",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<OffsetDateTime>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl User {
    /// Fresh, not yet persisted user. Id and timestamps are stamped by the
    /// user service on create.
    pub fn new(first_name: String, last_name: String, email: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::nil(),
            first_name,
            last_name,
            email,
            password_hash: String::new(),
            role: Vec::new(),
            driver: false,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            profile: None,
        }
    }

    /// First stored role, or `"user"` when the list is empty.
    pub fn primary_role(&self) -> &str {
        self.role.first().map(String::as_str).unwrap_or(DEFAULT_ROLE)
    }
}

/// Partial update of a user: `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Vec<String>>,
    pub driver: Option<bool>,
    pub is_active: Option<bool>,
    pub deleted_at: Option<OffsetDateTime>,
}

impl UserPatch {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.password_hash {
            user.password_hash = v.clone();
        }
        if let Some(v) = &self.role {
            user.role = v.clone();
        }
        if let Some(v) = self.driver {
            user.driver = v;
        }
        if let Some(v) = self.is_active {
            user.is_active = v;
        }
        if let Some(v) = self.deleted_at {
            user.deleted_at = Some(v);
        }
    }
}
