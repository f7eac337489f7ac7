//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; those with free-form input also
//! implement `Validate`.

use serde::{Deserialize, Deserializer};
use validator::Validate;
use vidshare_core::{
    Rating, Snowflake, Visibility, MAX_COMMENT_LENGTH, MAX_PLAYLIST_TITLE_LENGTH,
};

// `validator` length bounds are `u64`
const MAX_COMMENT_LENGTH_U64: u64 = MAX_COMMENT_LENGTH as u64;
const MAX_PLAYLIST_TITLE_LENGTH_U64: u64 = MAX_PLAYLIST_TITLE_LENGTH as u64;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// Engagement Requests
// ============================================================================

/// Rate a video or a comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RateRequest {
    pub rating: Rating,

    /// Rating the client currently shows. Omitted: read from the store.
    /// `null`: the client shows no rating.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub current: Option<Option<Rating>>,
}

/// Toggle a subscription or a watch-later entry
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ToggleRequest {
    /// Whether the client currently shows the pair as present.
    /// Omitted: read from the store.
    pub current: Option<bool>,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create a comment, or a reply when `parent_id` is set
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = MAX_COMMENT_LENGTH_U64, message = "Comment must be 1-5000 characters"))]
    pub content: String,

    pub parent_id: Option<Snowflake>,
}

/// Edit own comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = MAX_COMMENT_LENGTH_U64, message = "Comment must be 1-5000 characters"))]
    pub content: String,
}

// ============================================================================
// Video Requests
// ============================================================================

/// Register an uploaded video (media already in object storage)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[validate(url(message = "Invalid video URL"))]
    pub video_url: String,

    #[serde(default)]
    pub thumbnail_url: String,

    #[serde(default)]
    #[validate(length(max = 16))]
    pub duration: String,

    #[serde(default)]
    pub visibility: Visibility,
}

/// Owner edit of a video; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub thumbnail_url: Option<String>,

    pub visibility: Option<Visibility>,
}

/// Public feed filter
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchRequest {
    /// Matched against title, description and channel name
    #[validate(length(max = 100, message = "Search query must be at most 100 characters"))]
    pub q: Option<String>,
}

impl SearchRequest {
    /// The trimmed query, if anything is left
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Edit own channel profile; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "Display name must be 1-50 characters"))]
    pub display_name: Option<String>,

    /// An empty bio clears it
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Invalid photo URL"))]
    pub photo_url: Option<String>,
}

// ============================================================================
// Playlist Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = MAX_PLAYLIST_TITLE_LENGTH_U64, message = "Title must be 1-150 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[serde(default)]
    pub visibility: Visibility,
}
