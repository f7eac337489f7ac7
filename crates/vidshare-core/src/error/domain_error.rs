//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Engagement taxonomy
    // =========================================================================
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Referenced {object} does not exist: {id}")]
    ReferenceError { object: &'static str, id: Snowflake },

    #[error("Uniqueness constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Video not found: {0}")]
    VideoNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Replies can only be posted to top-level comments")]
    NestedReply,

    #[error("Cannot subscribe to your own channel")]
    SelfSubscription,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not comment author")]
    NotCommentAuthor,

    #[error("Not video owner")]
    NotVideoOwner,

    #[error("Not playlist owner")]
    NotPlaylistOwner,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::ReferenceError { .. } => "REFERENCE_ERROR",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",

            Self::VideoNotFound(_) => "UNKNOWN_VIDEO",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::PlaylistNotFound(_) => "UNKNOWN_PLAYLIST",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::NestedReply => "NESTED_REPLY",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",

            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotVideoOwner => "NOT_VIDEO_OWNER",
            Self::NotPlaylistOwner => "NOT_PLAYLIST_OWNER",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a reference error for a missing engagement target
    pub fn reference(object: &'static str, id: Snowflake) -> Self {
        Self::ReferenceError { object, id }
    }

    /// Check if this is a "not found" error (dangling references included)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ReferenceError { .. }
                | Self::VideoNotFound(_)
                | Self::CommentNotFound(_)
                | Self::ChannelNotFound(_)
                | Self::PlaylistNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::NestedReply
                | Self::SelfSubscription
        )
    }

    /// Check if the caller has no valid session
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotCommentAuthor | Self::NotVideoOwner | Self::NotPlaylistOwner
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    /// Transient failure: the user may retry the same action
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
