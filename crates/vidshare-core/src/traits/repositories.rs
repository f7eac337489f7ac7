//! Store traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Comment, Playlist, Tally, UserProfile, Video};
use crate::error::DomainError;
use crate::events::EngagementEvent;
use crate::value_objects::{Disposition, EngagementKind, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset pagination for library listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

// ============================================================================
// Disposition Store
// ============================================================================

/// One disposition table: at most one row per (subject, object).
///
/// Every mutation recomputes the object's counters from the live rows in the
/// same transaction and returns them.
#[async_trait]
pub trait DispositionStore<D: Disposition>: Send + Sync {
    /// Which engagement table this store owns
    fn kind(&self) -> EngagementKind;

    /// Point lookup by pair
    async fn find(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Option<D>>;

    /// Insert a new row; `ConstraintViolation` if the pair already exists
    async fn insert(&self, subject: Snowflake, object: Snowflake, value: D) -> RepoResult<Tally>;

    /// Insert or overwrite the row keyed by the pair
    async fn upsert(&self, subject: Snowflake, object: Snowflake, value: D) -> RepoResult<Tally>;

    /// Delete the row keyed by the pair (no-op if absent)
    async fn delete(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Tally>;

    /// Live counters of the object
    async fn tally(&self, object: Snowflake) -> RepoResult<Tally>;
}

// ============================================================================
// Video Repository
// ============================================================================

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Find video by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>>;

    /// Create a new video
    async fn create(&self, video: &Video) -> RepoResult<()>;

    /// Atomically bump the view counter, returning the new count
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64>;

    /// Videos the user liked, newest like first
    async fn find_liked_by_user(&self, user_id: Snowflake, page: PageQuery)
        -> RepoResult<Vec<Video>>;

    /// Videos in the user's watch-later list, newest first
    async fn find_watch_later_by_user(
        &self,
        user_id: Snowflake,
        page: PageQuery,
    ) -> RepoResult<Vec<Video>>;

    /// Public videos, newest first. With a query, only videos whose title,
    /// description or channel name contains it (case-insensitive).
    async fn find_public(&self, query: Option<&str>, page: PageQuery) -> RepoResult<Vec<Video>>;

    /// A channel's uploads, newest first
    async fn find_by_channel(
        &self,
        user_id: Snowflake,
        public_only: bool,
        page: PageQuery,
    ) -> RepoResult<Vec<Video>>;

    /// Overwrite the editable fields: title, description, thumbnail and visibility
    async fn update(&self, video: &Video) -> RepoResult<()>;

    /// Delete a video; its ratings, watch-later rows and comments go with it
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserProfile>>;

    /// Create a new profile
    async fn create(&self, profile: &UserProfile) -> RepoResult<()>;

    /// Channels the user subscribes to, newest subscription first
    async fn find_subscriptions(
        &self,
        subscriber_id: Snowflake,
        page: PageQuery,
    ) -> RepoResult<Vec<UserProfile>>;

    /// Overwrite display name, bio and photo
    async fn update(&self, profile: &UserProfile) -> RepoResult<()>;
}

// ============================================================================
// Playlist Repository
// ============================================================================

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Playlist>>;

    async fn create(&self, playlist: &Playlist) -> RepoResult<()>;

    /// The user's playlists, newest first
    async fn find_by_user(&self, user_id: Snowflake, page: PageQuery)
        -> RepoResult<Vec<Playlist>>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// All comments of a video, in no particular order
    async fn find_by_video(&self, video_id: Snowflake) -> RepoResult<Vec<Comment>>;

    /// Create a new comment
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Update comment content
    async fn update(&self, comment: &Comment) -> RepoResult<()>;

    /// Delete a comment together with its replies
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Session revocation
// ============================================================================

/// Signed-out session ids, kept until the token would have expired anyway
#[async_trait]
pub trait SessionRevocations: Send + Sync {
    /// Refuse the session from now until `expires_at`
    async fn revoke(&self, session_id: &str, expires_at: DateTime<Utc>) -> RepoResult<()>;

    async fn is_revoked(&self, session_id: &str) -> RepoResult<bool>;
}

// ============================================================================
// Event sink and health
// ============================================================================

/// Fan-out of engagement events to notification consumers
#[async_trait]
pub trait EngagementNotifier: Send + Sync {
    async fn notify(&self, event: &EngagementEvent) -> RepoResult<()>;
}

/// Readiness probe of a backing dependency
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Dependency name reported in readiness output
    fn name(&self) -> &'static str;

    async fn check(&self) -> bool;
}
