use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Free-form content of a profile. Updates replace it as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProfileDetails {
    pub bio: String,
    pub avatar: String,
    pub instagram_url: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone_number: String,
    pub website: String,
    pub whatsapp: String,
}

/// Profile record in the database, owned by exactly one user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: ProfileDetails,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub version: i64, // compare-and-set token for saves
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
}

impl Profile {
    pub fn new(user_id: Uuid, details: ProfileDetails) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::nil(),
            user_id,
            details,
            is_active: true,
            version: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_flattened_and_version_hidden() {
        let profile = Profile::new(
            Uuid::new_v4(),
            ProfileDetails {
                bio: "hello".into(),
                city: "Rosario".into(),
                ..ProfileDetails::default()
            },
        );
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["bio"], "hello");
        assert_eq!(json["city"], "Rosario");
        assert_eq!(json["isActive"], true);
        assert!(json.get("details").is_none());
        assert!(json.get("version").is_none());
        assert!(json.get("deletedAt").is_none());
    }
}
