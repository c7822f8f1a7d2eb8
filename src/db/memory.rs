//! In-memory gateways for tests. Enforces the same constraints as the
//! migrations: unique email, one profile per user, profile owner must exist.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{StoreError, StoreResult};
use crate::profiles::repo::ProfileStore;
use crate::profiles::repo_types::Profile;
use crate::users::repo::UserStore;
use crate::users::repo_types::{User, UserPatch};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
}

#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw row, ignoring the active flag.
    pub fn user_row(&self, id: Uuid) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn profile_row(&self, user_id: Uuid) -> Option<Profile> {
        let tables = self.tables.lock().unwrap();
        tables.profiles.iter().find(|p| p.user_id == user_id).cloned()
    }
}

impl Tables {
    fn active_profile(&self, user_id: Uuid) -> Option<Profile> {
        self.profiles
            .iter()
            .find(|p| p.user_id == user_id && p.is_active)
            .cloned()
    }

    fn with_profile(&self, mut user: User) -> User {
        user.profile = self.active_profile(user.id);
        user
    }
}

#[async_trait]
impl UserStore for MemoryDb {
    async fn create(&self, user: &User) -> StoreResult<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("email already registered".into()));
        }
        let mut row = user.clone();
        row.profile = None;
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_active_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter()
            .find(|u| u.id == id && u.is_active)
            .cloned();
        Ok(user.map(|u| tables.with_profile(u)))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_active(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().filter(|u| u.is_active).cloned().collect())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &UserPatch,
        updated_at: OffsetDateTime,
    ) -> StoreResult<Option<User>> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(email) = &patch.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::UniqueViolation("email already registered".into()));
            }
        }
        let Some(row) = tables.users.iter_mut().find(|u| u.id == id && u.is_active) else {
            return Ok(None);
        };
        patch.apply_to(row);
        row.updated_at = updated_at;
        let updated = row.clone();
        Ok(Some(tables.with_profile(updated)))
    }
}

#[async_trait]
impl ProfileStore for MemoryDb {
    async fn create(&self, profile: &Profile) -> StoreResult<Profile> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == profile.user_id) {
            return Err(StoreError::ForeignKeyViolation(
                "referenced record does not exist".into(),
            ));
        }
        if tables.profiles.iter().any(|p| p.user_id == profile.user_id) {
            return Err(StoreError::UniqueViolation("user already has a profile".into()));
        }
        tables.profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn find_active_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.active_profile(user_id))
    }

    async fn save(&self, profile: &Profile) -> StoreResult<Option<Profile>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.profiles.iter_mut().find(|p| {
            p.user_id == profile.user_id && p.version == profile.version && p.is_active
        }) else {
            return Ok(None);
        };
        row.details = profile.details.clone();
        row.is_active = profile.is_active;
        row.updated_at = profile.updated_at;
        row.deleted_at = profile.deleted_at;
        row.version += 1;
        Ok(Some(row.clone()))
    }
}
