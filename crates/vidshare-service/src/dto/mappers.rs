//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use vidshare_core::{
    Comment, CommentThread, Disposition, Playlist, Reconciled, Tally, UserProfile, Video,
};

use super::responses::{
    ChannelResponse, CommentResponse, CommentThreadResponse, CountsResponse, EngagementResponse,
    PlaylistResponse, VideoResponse,
};

impl From<Tally> for CountsResponse {
    fn from(tally: Tally) -> Self {
        match tally {
            Tally::Rating { likes, dislikes } => Self::Rating { likes, dislikes },
            Tally::Presence { count } => Self::Presence { count },
        }
    }
}

impl EngagementResponse {
    pub fn from_reconciled<D: Disposition>(
        kind: vidshare_core::EngagementKind,
        reconciled: &Reconciled<D>,
    ) -> Self {
        Self {
            kind,
            object_id: reconciled.object.to_string(),
            effective: reconciled.effective.map(|d| d.to_string()),
            counts: reconciled.tally.into(),
        }
    }
}

// ============================================================================
// Video Mappers
// ============================================================================

impl From<&Video> for VideoResponse {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.to_string(),
            user_id: video.user_id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            video_url: video.video_url.clone(),
            duration: video.duration.clone(),
            visibility: video.visibility,
            views: video.views,
            likes: video.likes,
            dislikes: video.dislikes,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self::from(&video)
    }
}

impl From<&UserProfile> for ChannelResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            display_name: profile.display_name.clone(),
            photo_url: profile.photo_url.clone(),
            banner_url: profile.banner_url.clone(),
            bio: profile.bio.clone(),
            subscriber_count: profile.subscriber_count,
            video_count: profile.video_count,
        }
    }
}

impl From<UserProfile> for ChannelResponse {
    fn from(profile: UserProfile) -> Self {
        Self::from(&profile)
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            video_id: comment.video_id.to_string(),
            user_id: comment.user_id.to_string(),
            content: comment.content.clone(),
            parent_id: comment.parent_id.map(|id| id.to_string()),
            likes: comment.likes,
            dislikes: comment.dislikes,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::from(&comment)
    }
}

impl From<CommentThread> for CommentThreadResponse {
    fn from(thread: CommentThread) -> Self {
        Self {
            comment: thread.comment.into(),
            replies: thread.replies.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id.to_string(),
            user_id: playlist.user_id.to_string(),
            title: playlist.title,
            description: playlist.description,
            visibility: playlist.visibility,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidshare_core::{EngagementKind, Mutation, Rating, Snowflake};

    #[test]
    fn test_engagement_response_from_reconciled() {
        let reconciled = Reconciled {
            subject: Snowflake::new(1),
            object: Snowflake::new(99),
            effective: Some(Rating::Dislike),
            mutation: Mutation::Update(Rating::Dislike),
            tally: Tally::rating(4, 2),
        };
        let response = EngagementResponse::from_reconciled(EngagementKind::VideoRating, &reconciled);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "video_rating");
        assert_eq!(json["object_id"], "99");
        assert_eq!(json["effective"], "dislike");
        assert_eq!(json["counts"]["dislikes"], 2);
    }

    #[test]
    fn test_cleared_engagement_has_null_effective() {
        let reconciled: Reconciled<Rating> = Reconciled {
            subject: Snowflake::new(1),
            object: Snowflake::new(99),
            effective: None,
            mutation: Mutation::Delete,
            tally: Tally::rating(0, 0),
        };
        let json = serde_json::to_value(EngagementResponse::from_reconciled(
            EngagementKind::VideoRating,
            &reconciled,
        ))
        .unwrap();
        assert!(json["effective"].is_null());
    }

    #[test]
    fn test_comment_thread_mapping() {
        let video = Snowflake::new(5);
        let root = Comment::new(Snowflake::new(10), video, Snowflake::new(1), "root".into());
        let reply = Comment::new_reply(
            Snowflake::new(11),
            video,
            Snowflake::new(2),
            "reply".into(),
            root.id,
        );
        let thread = CommentThreadResponse::from(CommentThread {
            comment: root,
            replies: vec![reply],
        });
        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["id"], "10");
        assert!(json.get("parent_id").is_none());
        assert_eq!(json["replies"][0]["parent_id"], "10");
    }
}
