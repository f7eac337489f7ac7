//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub.

use vidshare_core::{EngagementKind, Snowflake};

/// Channel prefix for per-object engagement events
pub const ENGAGEMENT_CHANNEL_PREFIX: &str = "engagement:";
/// Channel prefix for user-specific events
pub const USER_CHANNEL_PREFIX: &str = "user:";

const KINDS: [EngagementKind; 4] = [
    EngagementKind::VideoRating,
    EngagementKind::CommentRating,
    EngagementKind::Subscription,
    EngagementKind::WatchLater,
];

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Changes to one object's engagement (viewers of a video page)
    Engagement {
        kind: EngagementKind,
        object: Snowflake,
    },
    /// Events for a specific user (e.g. an uploader's notifications)
    User(Snowflake),
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn engagement(kind: EngagementKind, object: Snowflake) -> Self {
        Self::Engagement { kind, object }
    }

    #[must_use]
    pub fn user(user_id: Snowflake) -> Self {
        Self::User(user_id)
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Engagement { kind, object } => {
                format!("{ENGAGEMENT_CHANNEL_PREFIX}{kind}:{object}")
            }
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if let Some(rest) = name.strip_prefix(ENGAGEMENT_CHANNEL_PREFIX) {
            if let Some((kind_str, id_str)) = rest.rsplit_once(':') {
                let kind = KINDS.into_iter().find(|k| k.as_str() == kind_str);
                if let (Some(kind), Ok(id)) = (kind, id_str.parse::<i64>()) {
                    return Self::engagement(kind, Snowflake::from(id));
                }
            }
        }

        if let Some(id_str) = name.strip_prefix(USER_CHANNEL_PREFIX) {
            if let Ok(id) = id_str.parse::<i64>() {
                return Self::User(Snowflake::from(id));
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
