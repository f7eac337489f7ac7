//! User profile entity - a user doubles as a channel

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Public-facing user profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Snowflake,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub banner_url: Option<String>,
    pub bio: Option<String>,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new profile
    pub fn new(id: Snowflake, display_name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            display_name,
            email,
            photo_url: None,
            banner_url: None,
            bio: None,
            subscriber_count: 0,
            video_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
