//! Counter rows read back from the disposition tables

use sqlx::FromRow;

/// Like / dislike counts of one object
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RatingTallyModel {
    pub likes: i64,
    pub dislikes: i64,
}

/// Row count of a presence table for one object
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PresenceTallyModel {
    pub count: i64,
}
