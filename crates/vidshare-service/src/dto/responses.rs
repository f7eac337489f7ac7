//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vidshare_core::{EngagementKind, Rating, Visibility};

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset-paginated list
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Build a page from up to `limit + 1` fetched rows; the extra row only
    /// signals that another page exists.
    pub fn from_overfetch(mut data: Vec<T>, limit: i64, offset: i64) -> Self {
        let limit_len = usize::try_from(limit).unwrap_or(0);
        let has_more = data.len() > limit_len;
        data.truncate(limit_len);
        Self {
            data,
            pagination: PaginationMeta {
                limit,
                offset,
                has_more,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

// ============================================================================
// Engagement Responses
// ============================================================================

/// Live counters of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CountsResponse {
    Rating { likes: i64, dislikes: i64 },
    Presence { count: i64 },
}

/// Result of a toggle: what is stored now and the object's counters
#[derive(Debug, Clone, Serialize)]
pub struct EngagementResponse {
    pub kind: EngagementKind,
    pub object_id: String,
    /// Disposition stored after the call; `null` when the row was removed
    pub effective: Option<String>,
    pub counts: CountsResponse,
}

/// The caller's own engagement with a video page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewerEngagementResponse {
    pub rating: Option<Rating>,
    pub subscribed: bool,
    pub watch_later: bool,
}

/// Counters and viewer state shown next to a video
#[derive(Debug, Clone, Serialize)]
pub struct VideoEngagementResponse {
    pub video_id: String,
    pub likes: i64,
    pub dislikes: i64,
    pub subscriber_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerEngagementResponse>,
}

// ============================================================================
// Video Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: String,
    pub user_id: String,
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

/// Channel display info (a user profile without private fields)
#[derive(Debug, Clone, Serialize)]
pub struct ChannelResponse {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub subscriber_count: i64,
    pub video_count: i64,
}

/// Everything the watch page needs
#[derive(Debug, Clone, Serialize)]
pub struct VideoPageResponse {
    pub video: VideoResponse,
    pub channel: ChannelResponse,
    pub engagement: VideoEngagementResponse,
}

/// Channel page: profile, public uploads and the viewer's subscription
#[derive(Debug, Serialize)]
pub struct ChannelPageResponse {
    pub channel: ChannelResponse,
    pub videos: PaginatedResponse<VideoResponse>,
    /// `null` for anonymous viewers and on one's own channel
    pub subscribed: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewCountResponse {
    pub video_id: String,
    pub views: i64,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Top-level comment with its replies (oldest first)
#[derive(Debug, Clone, Serialize)]
pub struct CommentThreadResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

// ============================================================================
// Playlist Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Probe name -> "healthy" / "unhealthy"
    pub checks: BTreeMap<String, String>,
}

impl ReadinessResponse {
    pub fn from_checks<I>(checks: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, bool)>,
    {
        let checks: BTreeMap<String, bool> = checks
            .into_iter()
            .map(|(name, healthy)| (name.to_string(), healthy))
            .collect();
        let all_healthy = checks.values().all(|healthy| *healthy);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: checks
                .into_iter()
                .map(|(name, healthy)| {
                    let state = if healthy { "healthy" } else { "unhealthy" };
                    (name, state.to_string())
                })
                .collect(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
