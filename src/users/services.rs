use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::users::repo::UserStore;
use crate::users::repo_types::{User, UserPatch};

/// The slice of user operations the auth flow depends on.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create_user(&self, user: User) -> AppResult<User>;
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

fn user_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("user {id} not found"))
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Stamps id, timestamps and the active flag, then inserts.
    #[instrument(skip(self, user), fields(email = %user.email), err)]
    pub async fn create_user(&self, mut user: User) -> AppResult<User> {
        let now = OffsetDateTime::now_utc();
        if user.id.is_nil() {
            user.id = Uuid::new_v4();
        }
        user.created_at = now;
        user.updated_at = now;
        user.deleted_at = None;
        user.is_active = true;

        let created = self.store.create(&user).await?;
        info!(user_id = %created.id, "user created");
        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub async fn get_all_users(&self) -> AppResult<Vec<User>> {
        Ok(self.store.list_active().await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_user_by_id(&self, id: Uuid) -> AppResult<User> {
        self.store
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self), err)]
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }

    /// Partial merge onto the active row: fields absent from `patch` keep
    /// their stored value.
    #[instrument(skip(self, patch), err)]
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> AppResult<User> {
        let updated = self
            .store
            .update(id, &patch, OffsetDateTime::now_utc())
            .await?
            .ok_or_else(|| user_not_found(id))?;
        info!(user_id = %id, "user updated");
        Ok(updated)
    }

    #[instrument(skip(self), err)]
    pub async fn soft_delete_user(&self, id: Uuid) -> AppResult<User> {
        let user = self.get_user_by_id(id).await?;
        let patch = UserPatch {
            is_active: Some(false),
            deleted_at: Some(OffsetDateTime::now_utc()),
            ..UserPatch::default()
        };
        let deleted = self.update_user(user.id, patch).await?;
        info!(user_id = %id, "user soft-deleted");
        Ok(deleted)
    }
}

#[async_trait]
impl UserDirectory for UserService {
    async fn create_user(&self, user: User) -> AppResult<User> {
        UserService::create_user(self, user).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        UserService::get_user_by_email(self, email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDb;

    fn service() -> (UserService, Arc<MemoryDb>) {
        let db = Arc::new(MemoryDb::new());
        (UserService::new(db.clone()), db)
    }

    fn sample(email: &str) -> User {
        let mut user = User::new("Ana".into(), "Diaz".into(), email.into());
        user.password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into();
        user.role = vec!["driver".into()];
        user
    }

    #[tokio::test]
    async fn create_user_marks_active_and_assigns_id() {
        let (svc, _) = service();
        let mut input = sample("ana@example.com");
        input.is_active = false;

        let user = svc.create_user(input).await.expect("create");
        assert!(!user.id.is_nil());
        assert!(user.is_active);
        assert!(user.deleted_at.is_none());

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_bad_request() {
        let (svc, _) = service();
        svc.create_user(sample("dup@example.com")).await.unwrap();
        let err = svc.create_user(sample("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let (svc, _) = service();
        svc.create_user(sample("Case@example.com")).await.unwrap();
        assert!(svc.get_user_by_email("Case@example.com").await.is_ok());
        let err = svc.get_user_by_email("case@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_all_users_skips_soft_deleted() {
        let (svc, _) = service();
        let a = svc.create_user(sample("a@example.com")).await.unwrap();
        let b = svc.create_user(sample("b@example.com")).await.unwrap();
        svc.soft_delete_user(a.id).await.unwrap();

        let all = svc.get_all_users().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, b.id);
    }

    #[tokio::test]
    async fn soft_deleted_user_is_not_found_but_row_remains() {
        let (svc, db) = service();
        let user = svc.create_user(sample("gone@example.com")).await.unwrap();

        let deleted = svc.soft_delete_user(user.id).await.unwrap();
        assert!(!deleted.is_active);
        assert!(deleted.deleted_at.is_some());

        let err = svc.get_user_by_id(user.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let row = db.user_row(user.id).expect("row kept");
        assert!(!row.is_active);

        // still visible to the login flow
        let by_email = svc.get_user_by_email("gone@example.com").await.unwrap();
        assert!(!by_email.is_active);
    }

    #[tokio::test]
    async fn soft_delete_of_missing_user_is_not_found() {
        let (svc, _) = service();
        let err = svc.soft_delete_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_user_leaves_absent_fields_unchanged() {
        let (svc, _) = service();
        let user = svc.create_user(sample("merge@example.com")).await.unwrap();

        let updated = svc
            .update_user(
                user.id,
                UserPatch {
                    first_name: Some("Anabel".into()),
                    driver: Some(true),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Anabel");
        assert!(updated.driver);
        assert_eq!(updated.last_name, user.last_name);
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.role, user.role);
        assert_eq!(updated.password_hash, user.password_hash);
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn update_to_taken_email_is_a_bad_request() {
        let (svc, _) = service();
        svc.create_user(sample("taken@example.com")).await.unwrap();
        let user = svc.create_user(sample("free@example.com")).await.unwrap();

        let err = svc
            .update_user(
                user.id,
                UserPatch {
                    email: Some("taken@example.com".into()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let (svc, _) = service();
        let err = svc
            .update_user(Uuid::new_v4(), UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
