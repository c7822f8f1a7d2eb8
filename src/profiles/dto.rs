use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::profiles::repo_types::ProfileDetails;
use crate::validation::or_no_information;

/// Request body for `POST /profile` and `PUT /profile/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub user_id: Option<Uuid>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub twitter_url: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub whatsapp: Option<String>,
}

impl ProfileRequest {
    pub fn require_user_id(&self) -> AppResult<Uuid> {
        self.user_id
            .ok_or_else(|| AppError::bad_request("user_id is required"))
    }

    /// Content fields with absent ones set to "no information".
    pub fn into_details(self) -> ProfileDetails {
        ProfileDetails {
            bio: or_no_information(self.bio),
            avatar: or_no_information(self.avatar),
            instagram_url: or_no_information(self.instagram_url),
            facebook_url: or_no_information(self.facebook_url),
            twitter_url: or_no_information(self.twitter_url),
            street: or_no_information(self.street),
            city: or_no_information(self.city),
            state: or_no_information(self.state),
            zip_code: or_no_information(self.zip_code),
            country: or_no_information(self.country),
            phone_number: or_no_information(self.phone_number),
            website: or_no_information(self.website),
            whatsapp: or_no_information(self.whatsapp),
        }
    }
}
