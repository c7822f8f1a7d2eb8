use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::profiles::repo::ProfileStore;
use crate::profiles::repo_types::{Profile, ProfileDetails};

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

fn profile_not_found(user_id: Uuid) -> AppError {
    AppError::not_found(format!("profile for user {user_id} not found"))
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.user_id), err)]
    pub async fn create_profile(&self, mut profile: Profile) -> AppResult<Profile> {
        let now = OffsetDateTime::now_utc();
        profile.id = Uuid::new_v4();
        profile.created_at = now;
        profile.updated_at = now;
        profile.deleted_at = None;
        profile.is_active = true;
        profile.version = 0;

        let created = self.store.create(&profile).await?;
        info!(profile_id = %created.id, "profile created");
        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Profile> {
        self.store
            .find_active_by_user_id(user_id)
            .await?
            .ok_or_else(|| profile_not_found(user_id))
    }

    /// Replaces every content field, then saves against the loaded version.
    #[instrument(skip(self, details), err)]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        details: ProfileDetails,
    ) -> AppResult<Profile> {
        let mut profile = self.get_profile(user_id).await?;
        profile.details = details;
        profile.updated_at = OffsetDateTime::now_utc();

        let saved = self.save(profile).await?;
        info!(profile_id = %saved.id, "profile updated");
        Ok(saved)
    }

    #[instrument(skip(self), err)]
    pub async fn soft_delete_profile(&self, user_id: Uuid) -> AppResult<Profile> {
        let mut profile = self.get_profile(user_id).await?;
        let now = OffsetDateTime::now_utc();
        profile.is_active = false;
        profile.deleted_at = Some(now);
        profile.updated_at = now;

        let saved = self.save(profile).await?;
        info!(profile_id = %saved.id, "profile soft-deleted");
        Ok(saved)
    }

    /// A refused save is a conflict while the row is still active, and
    /// `NotFound` once it has been soft-deleted in between.
    async fn save(&self, profile: Profile) -> AppResult<Profile> {
        if let Some(saved) = self.store.save(&profile).await? {
            return Ok(saved);
        }

        let user_id = profile.user_id;
        if self.store.find_active_by_user_id(user_id).await?.is_none() {
            warn!(%user_id, "profile deleted before save");
            return Err(profile_not_found(user_id));
        }
        warn!(%user_id, version = profile.version, "stale profile save");
        Err(AppError::Conflict("profile was modified concurrently".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDb;
    use crate::users::repo::UserStore;
    use crate::users::repo_types::User;
    use crate::validation::NO_INFORMATION;

    async fn setup() -> (ProfileService, Arc<MemoryDb>, Uuid) {
        let db = Arc::new(MemoryDb::new());
        let mut user = User::new("Ana".into(), "Diaz".into(), "ana@example.com".into());
        user.id = Uuid::new_v4();
        UserStore::create(db.as_ref(), &user).await.unwrap();
        (ProfileService::new(db.clone()), db, user.id)
    }

    fn details(bio: &str) -> ProfileDetails {
        ProfileDetails {
            bio: bio.into(),
            city: "Rosario".into(),
            ..ProfileDetails::default()
        }
    }

    #[tokio::test]
    async fn create_then_get_by_owner() {
        let (svc, _, user_id) = setup().await;
        let created = svc
            .create_profile(Profile::new(user_id, details("hi")))
            .await
            .unwrap();
        assert!(!created.id.is_nil());
        assert!(created.is_active);

        let fetched = svc.get_profile(user_id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.details.bio, "hi");
    }

    #[tokio::test]
    async fn second_profile_for_same_user_is_rejected() {
        let (svc, _, user_id) = setup().await;
        svc.create_profile(Profile::new(user_id, details("a")))
            .await
            .unwrap();
        let err = svc
            .create_profile(Profile::new(user_id, details("b")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn profile_for_unknown_user_is_rejected() {
        let (svc, _, _) = setup().await;
        let err = svc
            .create_profile(Profile::new(Uuid::new_v4(), details("a")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let (svc, _, user_id) = setup().await;
        svc.create_profile(Profile::new(user_id, details("old")))
            .await
            .unwrap();

        let incoming = ProfileDetails {
            bio: "new".into(),
            city: NO_INFORMATION.into(),
            ..ProfileDetails::default()
        };
        let updated = svc.update_profile(user_id, incoming.clone()).await.unwrap();
        assert_eq!(updated.details, incoming);
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn stale_save_is_a_conflict() {
        let (svc, db, user_id) = setup().await;
        svc.create_profile(Profile::new(user_id, details("v0")))
            .await
            .unwrap();

        let stale = svc.get_profile(user_id).await.unwrap();
        svc.update_profile(user_id, details("v1")).await.unwrap();

        let err = svc.save(stale).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(db.profile_row(user_id).unwrap().details.bio, "v1");
    }

    #[tokio::test]
    async fn save_after_concurrent_delete_is_not_found() {
        let (svc, _, user_id) = setup().await;
        svc.create_profile(Profile::new(user_id, details("v0")))
            .await
            .unwrap();

        let loaded = svc.get_profile(user_id).await.unwrap();
        svc.soft_delete_profile(user_id).await.unwrap();

        let err = svc.save(loaded).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn update_of_missing_profile_is_not_found() {
        let (svc, _, user_id) = setup().await;
        let err = svc
            .update_profile(user_id, details("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn soft_delete_hides_profile_but_keeps_row() {
        let (svc, db, user_id) = setup().await;
        svc.create_profile(Profile::new(user_id, details("bye")))
            .await
            .unwrap();

        let deleted = svc.soft_delete_profile(user_id).await.unwrap();
        assert!(!deleted.is_active);
        assert!(deleted.deleted_at.is_some());

        let err = svc.get_profile(user_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(db.profile_row(user_id).is_some());

        let err = svc.soft_delete_profile(user_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
