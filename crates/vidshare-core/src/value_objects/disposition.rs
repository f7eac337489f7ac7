//! Dispositions - the values a subject can record against an object
//!
//! Two families exist:
//! - [`Rating`]: like / dislike on videos and comments (absent row = neutral)
//! - [`Presence`]: row exists or not (subscriptions, watch-later)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::Tally;

/// A value that can be stored in a disposition row
///
/// `Copy + Eq` is all the reconciler needs: it only ever compares the
/// current and requested values.
pub trait Disposition: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Counters of one object given all of its rows
    fn tally<I>(rows: I) -> Tally
    where
        I: IntoIterator<Item = Self>;
}

/// Like or dislike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Like,
    Dislike,
}

impl Rating {
    /// Store encoding (`is_like` column)
    #[inline]
    pub const fn is_like(self) -> bool {
        matches!(self, Self::Like)
    }

    /// Decode from the `is_like` column
    #[inline]
    pub const fn from_is_like(is_like: bool) -> Self {
        if is_like {
            Self::Like
        } else {
            Self::Dislike
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = DispositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            _ => Err(DispositionParseError(s.to_string())),
        }
    }
}

impl Disposition for Rating {
    fn tally<I>(rows: I) -> Tally
    where
        I: IntoIterator<Item = Self>,
    {
        Tally::from_ratings(rows)
    }
}

/// Presence-only disposition: the row exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Present,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("present")
    }
}

impl Disposition for Presence {
    fn tally<I>(rows: I) -> Tally
    where
        I: IntoIterator<Item = Self>,
    {
        Tally::presence(rows.into_iter().count() as i64)
    }
}

/// Error when parsing a disposition from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disposition: {0}")]
pub struct DispositionParseError(pub String);

/// Which engagement table a (subject, object) pair lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    VideoRating,
    CommentRating,
    Subscription,
    WatchLater,
}

impl EngagementKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VideoRating => "video_rating",
            Self::CommentRating => "comment_rating",
            Self::Subscription => "subscription",
            Self::WatchLater => "watch_later",
        }
    }

    /// Name of the object the pair points at
    pub const fn object_name(self) -> &'static str {
        match self {
            Self::VideoRating | Self::WatchLater => "Video",
            Self::CommentRating => "Comment",
            Self::Subscription => "Channel",
        }
    }
}

impl fmt::Display for EngagementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
