//! # vidshare-db
//!
//! Database layer implementing the store traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Disposition stores (`video_likes`, `comment_likes`, `subscriptions`,
//!   `watch_later`) whose mutations recompute object counters in the same
//!   transaction
//! - Video, profile, comment and playlist repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vidshare_db::{create_pool, run_migrations, DatabaseConfig, PgRatingStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let video_ratings = PgRatingStore::videos(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgHealthProbe, PgPool};
pub use repositories::{
    PgCommentRepository, PgPlaylistRepository, PgPresenceStore, PgProfileRepository,
    PgRatingStore, PgVideoRepository,
};
