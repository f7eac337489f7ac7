//! User (channel) database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
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
