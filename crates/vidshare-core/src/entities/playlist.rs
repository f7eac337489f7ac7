//! Playlist entity

use chrono::{DateTime, Utc};

use super::video::Visibility;
use crate::value_objects::Snowflake;

/// Maximum playlist title length in characters
pub const MAX_PLAYLIST_TITLE_LENGTH: usize = 150;

/// A named collection owned by one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new public playlist
    pub fn new(id: Snowflake, user_id: Snowflake, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            title,
            description: String::new(),
            visibility: Visibility::Public,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }

    pub fn is_visible_to(&self, viewer: Option<Snowflake>) -> bool {
        self.visibility != Visibility::Private || viewer == Some(self.user_id)
    }
}
