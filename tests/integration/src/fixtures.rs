//! Test fixtures and data generators
//!
//! Seeds profiles, videos and comments directly into the in-memory stores.

use serde_json::{json, Value};
use vidshare_core::traits::{CommentRepository, ProfileRepository, VideoRepository};
use vidshare_core::{Comment, Snowflake, UserProfile, Video, Visibility};

use crate::helpers::TestApp;

/// Uploader of the seeded videos
pub const CREATOR: Snowflake = Snowflake::new(1_000);
/// A second signed-in user
pub const VIEWER: Snowflake = Snowflake::new(2_000);
/// Public video uploaded by [`CREATOR`]
pub const PUBLIC_VIDEO: Snowflake = Snowflake::new(10_000);
/// Private video uploaded by [`CREATOR`]
pub const PRIVATE_VIDEO: Snowflake = Snowflake::new(10_001);

impl TestApp {
    /// App with two users and one public and one private video
    pub async fn seeded() -> Self {
        let app = Self::new();
        for (id, name) in [(CREATOR, "creator"), (VIEWER, "viewer")] {
            app.backend
                .profiles
                .create(&UserProfile::new(id, name.to_string(), format!("{name}@example.com")))
                .await
                .expect("seed profile");
        }

        let public = Video::new(
            PUBLIC_VIDEO,
            CREATOR,
            "Public clip".to_string(),
            "https://cdn.example.com/public.mp4".to_string(),
        );
        let mut private = Video::new(
            PRIVATE_VIDEO,
            CREATOR,
            "Private clip".to_string(),
            "https://cdn.example.com/private.mp4".to_string(),
        );
        private.visibility = Visibility::Private;
        for video in [&public, &private] {
            app.backend.videos.create(video).await.expect("seed video");
        }

        app
    }

    /// Insert a comment directly
    pub async fn seed_comment(&self, id: i64, author: Snowflake, parent: Option<Snowflake>) -> Snowflake {
        let id = Snowflake::new(id);
        let comment = match parent {
            Some(parent) => Comment::new_reply(id, PUBLIC_VIDEO, author, format!("reply {id}"), parent),
            None => Comment::new(id, PUBLIC_VIDEO, author, format!("comment {id}")),
        };
        self.backend.comments.create(&comment).await.expect("seed comment");
        id
    }
}

/// `PUT .../rating` body
pub fn rate_body(rating: &str, current: Option<Option<&str>>) -> Value {
    match current {
        None => json!({ "rating": rating }),
        Some(current) => json!({ "rating": rating, "current": current }),
    }
}

/// Toggle body carrying the client's view of the pair
pub fn toggle_body(current: bool) -> Value {
    json!({ "current": current })
}

/// `POST /videos/{id}/comments` body
pub fn comment_body(content: &str, parent_id: Option<Snowflake>) -> Value {
    match parent_id {
        Some(parent) => json!({ "content": content, "parent_id": parent.to_string() }),
        None => json!({ "content": content }),
    }
}

pub fn video_path(video: Snowflake, suffix: &str) -> String {
    format!("/api/v1/videos/{video}{suffix}")
}
