//! Comment entity and flat reply threading
//!
//! Comments are threaded exactly one level deep: a comment is either
//! top-level (`parent_id == None`) or a reply to a top-level comment.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 5000;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub video_id: Snowflake,
    pub user_id: Snowflake,
    pub content: String,
    pub parent_id: Option<Snowflake>,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new top-level comment
    pub fn new(id: Snowflake, video_id: Snowflake, user_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            video_id,
            user_id,
            content,
            parent_id: None,
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a reply to a top-level comment
    pub fn new_reply(
        id: Snowflake,
        video_id: Snowflake,
        user_id: Snowflake,
        content: String,
        parent_id: Snowflake,
    ) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, video_id, user_id, content)
        }
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }

    /// Replace the content, bumping `updated_at`
    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Trim and bound-check comment content
    pub fn normalize_content(raw: &str) -> Result<String, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        if trimmed.chars().count() > MAX_COMMENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_COMMENT_LENGTH,
            });
        }
        Ok(trimmed.to_string())
    }
}

/// A top-level comment with its direct replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Group a video's comments into two-tier threads.
///
/// Top-level comments come newest first, replies oldest first. Replies whose
/// parent is missing (or is itself a reply) are dropped.
pub fn thread_comments(comments: Vec<Comment>) -> Vec<CommentThread> {
    let (mut roots, replies): (Vec<_>, Vec<_>) =
        comments.into_iter().partition(|c| c.parent_id.is_none());

    roots.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let mut by_parent: HashMap<Snowflake, Vec<Comment>> = HashMap::new();
    for reply in replies {
        if let Some(parent) = reply.parent_id {
            by_parent.entry(parent).or_default().push(reply);
        }
    }

    roots
        .into_iter()
        .map(|comment| {
            let mut replies = by_parent.remove(&comment.id).unwrap_or_default();
            replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            CommentThread { comment, replies }
        })
        .collect()
}
