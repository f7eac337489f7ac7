//! # vidshare-core
//!
//! Domain layer containing entities, dispositions, the toggle-set reconciler,
//! the caller session, store traits, and engagement events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod reconcile;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    thread_comments, Comment, CommentThread, EngagementRow, Playlist, Tally, UserProfile, Video,
    Visibility, MAX_COMMENT_LENGTH, MAX_PLAYLIST_TITLE_LENGTH,
};
pub use error::DomainError;
pub use events::{EngagementEvent, EventCounts};
pub use reconcile::{Mutation, PairGuard, PairKey, Reconciled, Reconciler, DEFAULT_STORE_TIMEOUT};
pub use session::{require_subject, Session, SessionState};
pub use traits::{
    CommentRepository, DispositionStore, EngagementNotifier, HealthProbe, PageQuery,
    PlaylistRepository, ProfileRepository, RepoResult, SessionRevocations, VideoRepository,
};
pub use value_objects::{
    Disposition, DispositionParseError, EngagementKind, Presence, Rating, Snowflake,
    SnowflakeGenerator, SnowflakeParseError,
};
