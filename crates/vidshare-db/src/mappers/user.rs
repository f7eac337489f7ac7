//! UserProfile entity <-> model mapper

use vidshare_core::entities::UserProfile;
use vidshare_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for UserProfile {
    fn from(model: UserModel) -> Self {
        UserProfile {
            id: Snowflake::new(model.id),
            display_name: model.display_name,
            email: model.email,
            photo_url: model.photo_url,
            banner_url: model.banner_url,
            bio: model.bio,
            subscriber_count: model.subscriber_count,
            video_count: model.video_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Profile values for database insertion
pub struct UserInsert<'a> {
    pub id: i64,
    pub display_name: &'a str,
    pub email: &'a str,
    pub photo_url: Option<&'a str>,
    pub banner_url: Option<&'a str>,
    pub bio: Option<&'a str>,
}

impl<'a> UserInsert<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            id: profile.id.into_inner(),
            display_name: &profile.display_name,
            email: &profile.email,
            photo_url: profile.photo_url.as_deref(),
            banner_url: profile.banner_url.as_deref(),
            bio: profile.bio.as_deref(),
        }
    }
}
