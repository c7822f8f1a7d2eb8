use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::profiles::repo_types::Profile;
use crate::users::repo_types::{User, UserPatch};

/// Persistence gateway for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. The caller provides the id.
    async fn create(&self, user: &User) -> StoreResult<User>;
    /// Active user by id, with its active profile eagerly loaded.
    async fn find_active_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    /// User by exact email, regardless of the active flag.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_active(&self) -> StoreResult<Vec<User>>;
    /// Merge the present fields of `patch` onto the active row `id` in one
    /// statement. `None` if no active row matched.
    async fn update(
        &self,
        id: Uuid,
        patch: &UserPatch,
        updated_at: OffsetDateTime,
    ) -> StoreResult<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn with_profile(&self, mut user: User) -> StoreResult<User> {
        user.profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, bio, avatar, instagram_url, facebook_url, twitter_url,
                   street, city, state, zip_code, country, phone_number, website, whatsapp,
                   is_active, version, created_at, updated_at, deleted_at
            FROM profiles
            WHERE user_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(user.id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> StoreResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role, driver,
                               is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, first_name, last_name, email, password_hash, role, driver,
                      is_active, created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.driver)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn find_active_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, driver,
                   is_active, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match user {
            Some(user) => Ok(Some(self.with_profile(user).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, driver,
                   is_active, created_at, updated_at, deleted_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list_active(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, driver,
                   is_active, created_at, updated_at, deleted_at
            FROM users
            WHERE is_active = TRUE
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &UserPatch,
        updated_at: OffsetDateTime,
    ) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                first_name    = COALESCE($2, first_name),
                last_name     = COALESCE($3, last_name),
                email         = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                role          = COALESCE($6, role),
                driver        = COALESCE($7, driver),
                is_active     = COALESCE($8, is_active),
                deleted_at    = COALESCE($9, deleted_at),
                updated_at    = $10
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, first_name, last_name, email, password_hash, role, driver,
                      is_active, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.password_hash.as_deref())
        .bind(patch.role.clone())
        .bind(patch.driver)
        .bind(patch.is_active)
        .bind(patch.deleted_at)
        .bind(updated_at)
        .fetch_optional(&self.db)
        .await?;

        match user {
            Some(user) => Ok(Some(self.with_profile(user).await?)),
            None => Ok(None),
        }
    }
}
