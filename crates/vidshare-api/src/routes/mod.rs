//! Route definitions
//!
//! All API routes organized by resource and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{auth, channels, comments, health, playlists, users, videos};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(video_routes())
        .merge(comment_routes())
        .merge(channel_routes())
        .merge(user_routes())
        .merge(playlist_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/logout", post(auth::logout))
}

fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(videos::list_videos).post(videos::create_video))
        .route(
            "/videos/:video_id",
            get(videos::get_video)
                .patch(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/videos/:video_id/engagement", get(videos::get_engagement))
        .route("/videos/:video_id/views", post(videos::record_view))
        .route("/videos/:video_id/rating", put(videos::rate_video))
        .route("/videos/:video_id/watch-later", put(videos::toggle_watch_later))
        .route(
            "/videos/:video_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/:comment_id",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/comments/:comment_id/rating", put(comments::rate_comment))
}

fn channel_routes() -> Router<AppState> {
    Router::new()
        .route("/channels/:channel_id", get(channels::get_channel))
        .route(
            "/channels/:channel_id/subscription",
            put(channels::toggle_subscription),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me", patch(users::update_profile))
        .route("/users/@me/videos", get(users::my_videos))
        .route("/users/@me/playlists", get(users::my_playlists))
        .route("/users/@me/liked", get(users::liked_videos))
        .route("/users/@me/watch-later", get(users::watch_later_videos))
        .route("/users/@me/subscriptions", get(users::subscriptions))
}

fn playlist_routes() -> Router<AppState> {
    Router::new()
        .route("/playlists", post(playlists::create_playlist))
        .route("/playlists/:playlist_id", delete(playlists::delete_playlist))
}
