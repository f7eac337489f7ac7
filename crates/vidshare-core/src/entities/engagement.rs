//! Engagement rows and the live counters derived from them

use chrono::{DateTime, Utc};

use crate::value_objects::{Disposition, Rating, Snowflake};

/// One persisted disposition row, unique per (subject, object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementRow<D: Disposition> {
    pub subject: Snowflake,
    pub object: Snowflake,
    pub disposition: D,
    pub created_at: DateTime<Utc>,
}

impl<D: Disposition> EngagementRow<D> {
    /// Create a new row stamped now
    pub fn new(subject: Snowflake, object: Snowflake, disposition: D) -> Self {
        Self {
            subject,
            object,
            disposition,
            created_at: Utc::now(),
        }
    }
}

/// Counters of an object, always equal to the live row count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Rating { likes: i64, dislikes: i64 },
    Presence { count: i64 },
}

impl Tally {
    pub const fn rating(likes: i64, dislikes: i64) -> Self {
        Self::Rating { likes, dislikes }
    }

    pub const fn presence(count: i64) -> Self {
        Self::Presence { count }
    }

    /// Count ratings from a row set
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        let (likes, dislikes) = ratings.into_iter().fold((0, 0), |(l, d), r| match r {
            Rating::Like => (l + 1, d),
            Rating::Dislike => (l, d + 1),
        });
        Self::Rating { likes, dislikes }
    }

    /// Total number of rows behind this tally
    pub fn total(&self) -> i64 {
        match *self {
            Self::Rating { likes, dislikes } => likes + dislikes,
            Self::Presence { count } => count,
        }
    }
}
