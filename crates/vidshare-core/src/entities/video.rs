//! Video entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Who can see a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unlisted,
}

impl Visibility {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "unlisted" => Ok(Self::Unlisted),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

/// Uploaded video with its denormalized counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: Snowflake,
    /// Channel (user) that uploaded the video
    pub user_id: Snowflake,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: String,
    pub visibility: Visibility,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Create a new public video with zeroed counters
    pub fn new(id: Snowflake, user_id: Snowflake, title: String, video_url: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            title,
            description: String::new(),
            thumbnail_url: String::new(),
            video_url,
            duration: String::new(),
            visibility: Visibility::Public,
            views: 0,
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Private videos are visible to their uploader only
    pub fn is_visible_to(&self, viewer: Option<Snowflake>) -> bool {
        self.visibility != Visibility::Private || viewer == Some(self.user_id)
    }
}
