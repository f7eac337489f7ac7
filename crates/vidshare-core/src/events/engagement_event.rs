//! Engagement events - emitted after a disposition mutation commits
//!
//! Consumed by notification fan-out (Redis pub/sub) and audit logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Tally;
use crate::value_objects::{Disposition, EngagementKind, Snowflake};

/// Counters carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventCounts {
    Rating { likes: i64, dislikes: i64 },
    Presence { count: i64 },
}

impl From<Tally> for EventCounts {
    fn from(tally: Tally) -> Self {
        match tally {
            Tally::Rating { likes, dislikes } => Self::Rating { likes, dislikes },
            Tally::Presence { count } => Self::Presence { count },
        }
    }
}

/// A committed engagement change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementEvent {
    pub kind: EngagementKind,
    pub subject: Snowflake,
    pub object: Snowflake,
    /// Owner of the object (uploader, comment author, channel), if known
    pub owner: Option<Snowflake>,
    /// Effective disposition after the change; `None` when the row was removed
    pub effective: Option<String>,
    pub counts: EventCounts,
    pub occurred_at: DateTime<Utc>,
}

impl EngagementEvent {
    pub fn new<D: Disposition>(
        kind: EngagementKind,
        subject: Snowflake,
        object: Snowflake,
        effective: Option<D>,
        tally: Tally,
    ) -> Self {
        Self {
            kind,
            subject,
            object,
            owner: None,
            effective: effective.map(|d| d.to_string()),
            counts: tally.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Attach the object's owner for per-user fan-out
    pub fn with_owner(mut self, owner: Snowflake) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Event type string for logging
    pub fn event_type(&self) -> &'static str {
        match (self.kind, self.effective.is_some()) {
            (EngagementKind::VideoRating | EngagementKind::CommentRating, true) => "RATING_SET",
            (EngagementKind::VideoRating | EngagementKind::CommentRating, false) => {
                "RATING_CLEARED"
            }
            (EngagementKind::Subscription, true) => "SUBSCRIBED",
            (EngagementKind::Subscription, false) => "UNSUBSCRIBED",
            (EngagementKind::WatchLater, true) => "WATCH_LATER_ADDED",
            (EngagementKind::WatchLater, false) => "WATCH_LATER_REMOVED",
        }
    }
}
