//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in vidshare-core.

mod comment;
mod disposition;
mod error;
mod playlist;
mod user;
mod video;

pub use comment::PgCommentRepository;
pub use disposition::{
    Counters, PairTable, PgPresenceStore, PgRatingStore, COMMENT_LIKES, SUBSCRIPTIONS,
    VIDEO_LIKES, WATCH_LATER,
};
pub use playlist::PgPlaylistRepository;
pub use user::PgProfileRepository;
pub use video::PgVideoRepository;
