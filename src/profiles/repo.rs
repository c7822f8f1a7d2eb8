use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::profiles::repo_types::Profile;

/// Persistence gateway for profiles. Profiles are addressed by their owning
/// user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create(&self, profile: &Profile) -> StoreResult<Profile>;
    async fn find_active_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;
    /// Write every column of `profile` if the stored row is still active and
    /// at `profile.version`; bumps the version. `None` when the row is gone
    /// or was written in between.
    async fn save(&self, profile: &Profile) -> StoreResult<Option<Profile>>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn create(&self, profile: &Profile) -> StoreResult<Profile> {
        let d = &profile.details;
        let created = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, user_id, bio, avatar, instagram_url, facebook_url,
                                  twitter_url, street, city, state, zip_code, country,
                                  phone_number, website, whatsapp, is_active, version,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19)
            RETURNING id, user_id, bio, avatar, instagram_url, facebook_url, twitter_url,
                      street, city, state, zip_code, country, phone_number, website, whatsapp,
                      is_active, version, created_at, updated_at, deleted_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&d.bio)
        .bind(&d.avatar)
        .bind(&d.instagram_url)
        .bind(&d.facebook_url)
        .bind(&d.twitter_url)
        .bind(&d.street)
        .bind(&d.city)
        .bind(&d.state)
        .bind(&d.zip_code)
        .bind(&d.country)
        .bind(&d.phone_number)
        .bind(&d.website)
        .bind(&d.whatsapp)
        .bind(profile.is_active)
        .bind(profile.version)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn find_active_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, bio, avatar, instagram_url, facebook_url, twitter_url,
                   street, city, state, zip_code, country, phone_number, website, whatsapp,
                   is_active, version, created_at, updated_at, deleted_at
            FROM profiles
            WHERE user_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(profile)
    }

    async fn save(&self, profile: &Profile) -> StoreResult<Option<Profile>> {
        let d = &profile.details;
        let saved = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                bio = $3, avatar = $4, instagram_url = $5, facebook_url = $6,
                twitter_url = $7, street = $8, city = $9, state = $10, zip_code = $11,
                country = $12, phone_number = $13, website = $14, whatsapp = $15,
                is_active = $16, updated_at = $17, deleted_at = $18,
                version = version + 1
            WHERE user_id = $1 AND version = $2 AND is_active = TRUE
            RETURNING id, user_id, bio, avatar, instagram_url, facebook_url, twitter_url,
                      street, city, state, zip_code, country, phone_number, website, whatsapp,
                      is_active, version, created_at, updated_at, deleted_at
            "#,
        )
        .bind(profile.user_id)
        .bind(profile.version)
        .bind(&d.bio)
        .bind(&d.avatar)
        .bind(&d.instagram_url)
        .bind(&d.facebook_url)
        .bind(&d.twitter_url)
        .bind(&d.street)
        .bind(&d.city)
        .bind(&d.state)
        .bind(&d.zip_code)
        .bind(&d.country)
        .bind(&d.phone_number)
        .bind(&d.website)
        .bind(&d.whatsapp)
        .bind(profile.is_active)
        .bind(profile.updated_at)
        .bind(profile.deleted_at)
        .fetch_optional(&self.db)
        .await?;
        Ok(saved)
    }
}
