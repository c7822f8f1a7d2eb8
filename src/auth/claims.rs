use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// JWT payload issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: Uuid,
    pub email: String,
    pub role: String, // first stored role, or "user"
    pub exp: i64,     // unix timestamp
}

impl TokenPayload {
    pub fn is_expired(&self) -> bool {
        self.exp < OffsetDateTime::now_utc().unix_timestamp()
    }
}
