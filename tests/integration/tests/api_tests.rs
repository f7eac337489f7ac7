//! API Integration Tests
//!
//! The whole router, middleware included, over the in-memory stores.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use axum::http::StatusCode;
use integration_tests::{
    assert_error, assert_status, comment_body, rate_body, toggle_body, video_path, TestApp,
    CREATOR, PRIVATE_VIDEO, PUBLIC_VIDEO, VIEWER,
};
use serde_json::{json, Value};
use vidshare_core::traits::CommentRepository;
use vidshare_core::{Comment, Presence, Rating, Snowflake};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let app = TestApp::new();
    let response = app.get("/health/ready", None).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(response.body["status"], "ready");
}

// ============================================================================
// Video Rating Tests
// ============================================================================

#[tokio::test]
async fn test_like_then_dislike_leaves_one_dislike() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    let path = video_path(PUBLIC_VIDEO, "/rating");

    let liked = app
        .put(&path, Some(&token), Some(rate_body("like", Some(None))))
        .await;
    assert_status(&liked, StatusCode::OK);
    assert_eq!(liked.body["effective"], "like");
    assert_eq!(liked.body["counts"], json!({ "likes": 1, "dislikes": 0 }));

    let switched = app
        .put(&path, Some(&token), Some(rate_body("dislike", Some(Some("like")))))
        .await;
    assert_status(&switched, StatusCode::OK);
    assert_eq!(switched.body["effective"], "dislike");
    assert_eq!(switched.body["counts"], json!({ "likes": 0, "dislikes": 1 }));

    assert_eq!(app.backend.video_ratings.rows_for(PUBLIC_VIDEO), 1);
    assert_eq!(
        app.backend.video_ratings.get(VIEWER, PUBLIC_VIDEO),
        Some(Rating::Dislike)
    );
}

#[tokio::test]
async fn test_like_then_undo() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    let path = video_path(PUBLIC_VIDEO, "/rating");

    app.put(&path, Some(&token), Some(rate_body("like", Some(None))))
        .await;
    let undone = app
        .put(&path, Some(&token), Some(rate_body("like", Some(Some("like")))))
        .await;

    assert_status(&undone, StatusCode::OK);
    assert_eq!(undone.body["effective"], Value::Null);
    assert_eq!(undone.body["counts"]["likes"], 0);
    assert_eq!(app.backend.video_ratings.row_count(), 0);
}

#[tokio::test]
async fn test_rating_parity_with_store_read() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    let path = video_path(PUBLIC_VIDEO, "/rating");

    for n in 1..=5 {
        let response = app
            .put(&path, Some(&token), Some(rate_body("like", None)))
            .await;
        assert_status(&response, StatusCode::OK);
        let expected = if n % 2 == 1 { json!("like") } else { Value::Null };
        assert_eq!(response.body["effective"], expected, "after {n} requests");
    }
}

#[tokio::test]
async fn test_unknown_rating_is_rejected() {
    let app = TestApp::seeded().await;
    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/rating"),
            Some(&app.token_for(VIEWER)),
            Some(json!({ "rating": "love" })),
        )
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "INVALID_BODY");
}

#[tokio::test]
async fn test_rating_missing_video_is_reference_error() {
    let app = TestApp::seeded().await;
    let response = app
        .put(
            &video_path(Snowflake::new(424_242), "/rating"),
            Some(&app.token_for(VIEWER)),
            Some(rate_body("like", Some(None))),
        )
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "REFERENCE_ERROR");
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_makes_no_mutation() {
    let app = TestApp::seeded().await;

    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/rating"),
            None,
            Some(rate_body("like", Some(None))),
        )
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "MISSING_AUTHORIZATION");

    let response = app
        .put(&video_path(PUBLIC_VIDEO, "/watch-later"), Some("not-a-jwt"), None)
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN");

    assert_eq!(app.backend.video_ratings.mutation_count(), 0);
    assert_eq!(app.backend.watch_later.mutation_count(), 0);
}

#[tokio::test]
async fn test_signed_out_session_is_refused() {
    let app = TestApp::seeded().await;
    let token = app.session_token(VIEWER, "viewer-laptop");
    let other_device = app.session_token(VIEWER, "viewer-phone");

    let response = app.post("/api/v1/auth/logout", Some(&token), None).await;
    assert_status(&response, StatusCode::NO_CONTENT);

    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/rating"),
            Some(&token),
            Some(rate_body("like", None)),
        )
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED");
    assert_eq!(app.backend.video_ratings.mutation_count(), 0);

    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/rating"),
            Some(&other_device),
            Some(rate_body("like", None)),
        )
        .await;
    assert_status(&response, StatusCode::OK);
}

// ============================================================================
// Store Failure Tests
// ============================================================================

#[tokio::test]
async fn test_store_outage_is_retryable_503() {
    let app = TestApp::seeded().await;
    app.backend.video_ratings.set_unavailable(true);

    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/rating"),
            Some(&app.token_for(VIEWER)),
            Some(rate_body("like", Some(None))),
        )
        .await;
    assert_error(&response, StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE");
    assert_eq!(response.body["error"]["retryable"], true);
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let app = TestApp::seeded().await;
    app.backend
        .watch_later
        .set_latency(Some(Duration::from_secs(2)));

    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/watch-later"),
            Some(&app.token_for(VIEWER)),
            Some(toggle_body(false)),
        )
        .await;
    assert_error(&response, StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE");
    assert_eq!(response.body["error"]["retryable"], true);
}

#[tokio::test]
async fn test_persistent_conflict_is_409() {
    let app = TestApp::seeded().await;
    app.backend.video_ratings.set_always_conflict(true);

    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/rating"),
            Some(&app.token_for(VIEWER)),
            Some(rate_body("like", Some(None))),
        )
        .await;
    assert_error(&response, StatusCode::CONFLICT, "CONSTRAINT_VIOLATION");
    assert!(response.body["error"].get("retryable").is_none());
}

#[tokio::test]
async fn test_lost_insert_race_resolves_from_fresh_read() {
    let app = TestApp::seeded().await;
    app.backend.video_ratings.race_next_insert(Rating::Like);

    // The racing writer already stored the same rating: the retry removes it
    let response = app
        .put(
            &video_path(PUBLIC_VIDEO, "/rating"),
            Some(&app.token_for(VIEWER)),
            Some(rate_body("like", Some(None))),
        )
        .await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(response.body["effective"], Value::Null);
    assert_eq!(app.backend.video_ratings.rows_for(PUBLIC_VIDEO), 0);
}

// ============================================================================
// Subscription & Watch-Later Tests
// ============================================================================

#[tokio::test]
async fn test_subscribe_then_unsubscribe_nets_zero() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    let path = format!("/api/v1/channels/{CREATOR}/subscription");

    let on = app.put(&path, Some(&token), Some(toggle_body(false))).await;
    assert_status(&on, StatusCode::OK);
    assert_eq!(on.body["effective"], "present");
    assert_eq!(on.body["counts"]["count"], 1);

    let off = app.put(&path, Some(&token), Some(toggle_body(true))).await;
    assert_eq!(off.body["effective"], Value::Null);
    assert_eq!(off.body["counts"]["count"], 0);

    assert_eq!(app.backend.subscriptions.rows_for(CREATOR), 0);
}

#[tokio::test]
async fn test_self_subscription_rejected() {
    let app = TestApp::seeded().await;
    let response = app
        .put(
            &format!("/api/v1/channels/{CREATOR}/subscription"),
            Some(&app.token_for(CREATOR)),
            None,
        )
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "SELF_SUBSCRIPTION");
}

#[tokio::test]
async fn test_watch_later_toggle_without_body() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    let path = video_path(PUBLIC_VIDEO, "/watch-later");

    let saved = app.put(&path, Some(&token), None).await;
    assert_status(&saved, StatusCode::OK);
    assert_eq!(saved.body["kind"], "watch_later");
    assert_eq!(
        app.backend.watch_later.get(VIEWER, PUBLIC_VIDEO),
        Some(Presence::Present)
    );

    let listed = app.get("/api/v1/users/@me/watch-later", Some(&token)).await;
    assert_status(&listed, StatusCode::OK);
    assert_eq!(listed.body["data"][0]["id"], PUBLIC_VIDEO.to_string());

    let removed = app.put(&path, Some(&token), None).await;
    assert_eq!(removed.body["effective"], Value::Null);
}

// ============================================================================
// Library Tests
// ============================================================================

#[tokio::test]
async fn test_library_listings() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);

    app.put(
        &video_path(PUBLIC_VIDEO, "/rating"),
        Some(&token),
        Some(rate_body("like", None)),
    )
    .await;
    app.put(
        &format!("/api/v1/channels/{CREATOR}/subscription"),
        Some(&token),
        None,
    )
    .await;

    let liked = app
        .get("/api/v1/users/@me/liked?limit=500", Some(&token))
        .await;
    assert_status(&liked, StatusCode::OK);
    assert_eq!(liked.body["data"][0]["title"], "Public clip");
    assert_eq!(liked.body["pagination"]["limit"], 100);
    assert_eq!(liked.body["pagination"]["has_more"], false);

    let channels = app
        .get("/api/v1/users/@me/subscriptions", Some(&token))
        .await;
    assert_eq!(channels.body["data"][0]["display_name"], "creator");
    assert_eq!(channels.body["data"][0]["subscriber_count"], 1);

    let anonymous = app.get("/api/v1/users/@me/liked", None).await;
    assert_status(&anonymous, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Video Tests
// ============================================================================

#[tokio::test]
async fn test_video_page_with_viewer_state() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    app.put(
        &video_path(PUBLIC_VIDEO, "/rating"),
        Some(&token),
        Some(rate_body("dislike", None)),
    )
    .await;

    let page = app.get(&video_path(PUBLIC_VIDEO, ""), Some(&token)).await;
    assert_status(&page, StatusCode::OK);
    assert_eq!(page.body["video"]["dislikes"], 1);
    assert_eq!(page.body["channel"]["id"], CREATOR.to_string());
    assert_eq!(page.body["engagement"]["viewer"]["rating"], "dislike");
    assert_eq!(page.body["engagement"]["viewer"]["subscribed"], false);

    let anonymous = app.get(&video_path(PUBLIC_VIDEO, "/engagement"), None).await;
    assert_status(&anonymous, StatusCode::OK);
    assert!(anonymous.body.get("viewer").is_none());
}

#[tokio::test]
async fn test_private_video_visible_to_owner_only() {
    let app = TestApp::seeded().await;

    let hidden = app
        .get(&video_path(PRIVATE_VIDEO, ""), Some(&app.token_for(VIEWER)))
        .await;
    assert_error(&hidden, StatusCode::NOT_FOUND, "UNKNOWN_VIDEO");

    let shown = app
        .get(&video_path(PRIVATE_VIDEO, ""), Some(&app.token_for(CREATOR)))
        .await;
    assert_status(&shown, StatusCode::OK);
    assert_eq!(shown.body["video"]["visibility"], "private");
}

#[tokio::test]
async fn test_private_video_cannot_be_engaged_by_others() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    let comment = Comment::new(
        Snowflake::new(60_000),
        PRIVATE_VIDEO,
        CREATOR,
        "owner note".to_string(),
    );
    app.backend.comments.create(&comment).await.expect("seed comment");

    let rated = app
        .put(
            &video_path(PRIVATE_VIDEO, "/rating"),
            Some(&token),
            Some(rate_body("like", None)),
        )
        .await;
    assert_error(&rated, StatusCode::NOT_FOUND, "UNKNOWN_VIDEO");

    let saved = app
        .put(&video_path(PRIVATE_VIDEO, "/watch-later"), Some(&token), None)
        .await;
    assert_error(&saved, StatusCode::NOT_FOUND, "UNKNOWN_VIDEO");

    let comment_rated = app
        .put(
            &format!("/api/v1/comments/{}/rating", comment.id),
            Some(&token),
            Some(rate_body("dislike", None)),
        )
        .await;
    assert_error(&comment_rated, StatusCode::NOT_FOUND, "UNKNOWN_COMMENT");

    let commented = app
        .post(
            &video_path(PRIVATE_VIDEO, "/comments"),
            Some(&token),
            Some(comment_body("let me in", None)),
        )
        .await;
    assert_error(&commented, StatusCode::NOT_FOUND, "UNKNOWN_VIDEO");

    assert_eq!(app.backend.comments.len(), 1);
    assert_eq!(app.backend.video_ratings.mutation_count(), 0);
    assert_eq!(app.backend.watch_later.mutation_count(), 0);
    assert_eq!(app.backend.comment_ratings.mutation_count(), 0);

    let own = app
        .put(
            &video_path(PRIVATE_VIDEO, "/rating"),
            Some(&app.token_for(CREATOR)),
            Some(rate_body("like", None)),
        )
        .await;
    assert_status(&own, StatusCode::OK);
}

#[tokio::test]
async fn test_views_are_counted() {
    let app = TestApp::seeded().await;
    for expected in 1..=3 {
        let response = app.post(&video_path(PUBLIC_VIDEO, "/views"), None, None).await;
        assert_status(&response, StatusCode::OK);
        assert_eq!(response.body["views"], expected);
    }
}

#[tokio::test]
async fn test_create_video() {
    let app = TestApp::seeded().await;
    let response = app
        .post(
            "/api/v1/videos",
            Some(&app.token_for(CREATOR)),
            Some(json!({
                "title": "New upload",
                "video_url": "https://cdn.example.com/new.mp4",
                "visibility": "unlisted"
            })),
        )
        .await;
    assert_status(&response, StatusCode::CREATED);
    assert_eq!(response.body["user_id"], CREATOR.to_string());
    assert_eq!(response.body["visibility"], "unlisted");

    let invalid = app
        .post(
            "/api/v1/videos",
            Some(&app.token_for(CREATOR)),
            Some(json!({ "title": "", "video_url": "nope" })),
        )
        .await;
    assert_error(&invalid, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_invalid_path_id() {
    let app = TestApp::seeded().await;
    let response = app.get("/api/v1/videos/not-a-number", None).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_feed_lists_public_videos_and_searches() {
    let app = TestApp::seeded().await;

    let feed = app.get("/api/v1/videos", None).await;
    assert_status(&feed, StatusCode::OK);
    assert_eq!(feed.body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(feed.body["data"][0]["id"], PUBLIC_VIDEO.to_string());

    let hit = app.get("/api/v1/videos?q=public", None).await;
    assert_eq!(hit.body["data"][0]["title"], "Public clip");

    let by_channel = app.get("/api/v1/videos?q=CREATOR", None).await;
    assert_eq!(by_channel.body["data"][0]["id"], PUBLIC_VIDEO.to_string());

    let miss = app.get("/api/v1/videos?q=private", None).await;
    assert_eq!(miss.body["data"], json!([]));
}

#[tokio::test]
async fn test_owner_edits_and_deletes_video() {
    let app = TestApp::seeded().await;
    let path = video_path(PUBLIC_VIDEO, "");
    let owner = app.token_for(CREATOR);
    let stranger = app.token_for(VIEWER);

    let hijack = app
        .patch(&path, Some(&stranger), json!({ "title": "mine now" }))
        .await;
    assert_error(&hijack, StatusCode::FORBIDDEN, "NOT_VIDEO_OWNER");

    let hidden = app
        .delete(&video_path(PRIVATE_VIDEO, ""), Some(&stranger))
        .await;
    assert_error(&hidden, StatusCode::NOT_FOUND, "UNKNOWN_VIDEO");

    let edited = app
        .patch(
            &path,
            Some(&owner),
            json!({ "title": "  Renamed  ", "visibility": "unlisted" }),
        )
        .await;
    assert_status(&edited, StatusCode::OK);
    assert_eq!(edited.body["title"], "Renamed");
    assert_eq!(edited.body["visibility"], "unlisted");

    let mine = app.get("/api/v1/users/@me/videos", Some(&owner)).await;
    assert_status(&mine, StatusCode::OK);
    assert_eq!(mine.body["data"].as_array().map(Vec::len), Some(2));

    app.put(
        &video_path(PUBLIC_VIDEO, "/rating"),
        Some(&stranger),
        Some(rate_body("like", None)),
    )
    .await;
    let deleted = app.delete(&path, Some(&owner)).await;
    assert_status(&deleted, StatusCode::NO_CONTENT);
    assert_eq!(app.backend.video_ratings.rows_for(PUBLIC_VIDEO), 0);

    let gone = app.get(&path, Some(&owner)).await;
    assert_error(&gone, StatusCode::NOT_FOUND, "UNKNOWN_VIDEO");
}

// ============================================================================
// Channel Tests
// ============================================================================

#[tokio::test]
async fn test_channel_page() {
    let app = TestApp::seeded().await;
    let path = format!("/api/v1/channels/{CREATOR}");

    let anonymous = app.get(&path, None).await;
    assert_status(&anonymous, StatusCode::OK);
    assert_eq!(anonymous.body["channel"]["display_name"], "creator");
    assert_eq!(anonymous.body["channel"]["video_count"], 2);
    assert_eq!(anonymous.body["videos"]["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(anonymous.body["subscribed"], Value::Null);

    let token = app.token_for(VIEWER);
    app.put(
        &format!("/api/v1/channels/{CREATOR}/subscription"),
        Some(&token),
        None,
    )
    .await;
    let viewer = app.get(&path, Some(&token)).await;
    assert_eq!(viewer.body["subscribed"], true);
    assert_eq!(viewer.body["channel"]["subscriber_count"], 1);

    let missing = app.get("/api/v1/channels/424242", None).await;
    assert_error(&missing, StatusCode::NOT_FOUND, "UNKNOWN_CHANNEL");
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);

    let updated = app
        .patch(
            "/api/v1/users/@me",
            Some(&token),
            json!({ "display_name": "Viewer Two", "bio": "hello" }),
        )
        .await;
    assert_status(&updated, StatusCode::OK);
    assert_eq!(updated.body["display_name"], "Viewer Two");
    assert_eq!(updated.body["bio"], "hello");

    let page = app.get(&format!("/api/v1/channels/{VIEWER}"), None).await;
    assert_eq!(page.body["channel"]["display_name"], "Viewer Two");

    let invalid = app
        .patch("/api/v1/users/@me", Some(&token), json!({ "photo_url": "nope" }))
        .await;
    assert_error(&invalid, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

// ============================================================================
// Playlist Tests
// ============================================================================

#[tokio::test]
async fn test_playlists_belong_to_their_owner() {
    let app = TestApp::seeded().await;
    let owner = app.token_for(CREATOR);

    let created = app
        .post(
            "/api/v1/playlists",
            Some(&owner),
            Some(json!({ "title": "Favourites" })),
        )
        .await;
    assert_status(&created, StatusCode::CREATED);
    assert_eq!(created.body["title"], "Favourites");
    let playlist_id = created.body["id"].as_str().unwrap_or_default().to_string();
    let path = format!("/api/v1/playlists/{playlist_id}");

    let listed = app.get("/api/v1/users/@me/playlists", Some(&owner)).await;
    assert_eq!(listed.body["data"][0]["id"], playlist_id.as_str());

    let hijack = app.delete(&path, Some(&app.token_for(VIEWER))).await;
    assert_error(&hijack, StatusCode::FORBIDDEN, "NOT_PLAYLIST_OWNER");

    let deleted = app.delete(&path, Some(&owner)).await;
    assert_status(&deleted, StatusCode::NO_CONTENT);
    let listed = app.get("/api/v1/users/@me/playlists", Some(&owner)).await;
    assert_eq!(listed.body["data"], json!([]));
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
async fn test_comment_threading() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);
    let path = video_path(PUBLIC_VIDEO, "/comments");

    let root = app
        .post(&path, Some(&token), Some(comment_body("  first!  ", None)))
        .await;
    assert_status(&root, StatusCode::CREATED);
    assert_eq!(root.body["content"], "first!");
    let root_id: Snowflake = root.body["id"].as_str().unwrap().parse().unwrap();

    let reply = app
        .post(&path, Some(&token), Some(comment_body("a reply", Some(root_id))))
        .await;
    assert_status(&reply, StatusCode::CREATED);
    let reply_id: Snowflake = reply.body["id"].as_str().unwrap().parse().unwrap();

    let nested = app
        .post(&path, Some(&token), Some(comment_body("too deep", Some(reply_id))))
        .await;
    assert_error(&nested, StatusCode::BAD_REQUEST, "NESTED_REPLY");

    let threads = app.get(&path, None).await;
    assert_status(&threads, StatusCode::OK);
    assert_eq!(threads.body.as_array().map(Vec::len), Some(1));
    assert_eq!(threads.body[0]["content"], "first!");
    assert_eq!(threads.body[0]["replies"][0]["content"], "a reply");
}

#[tokio::test]
async fn test_comment_edit_and_delete_by_author_only() {
    let app = TestApp::seeded().await;
    let root = app.seed_comment(50_000, CREATOR, None).await;
    app.seed_comment(50_001, VIEWER, Some(root)).await;
    let path = format!("/api/v1/comments/{root}");

    let hijack = app
        .patch(&path, Some(&app.token_for(VIEWER)), json!({ "content": "mine now" }))
        .await;
    assert_error(&hijack, StatusCode::FORBIDDEN, "NOT_COMMENT_AUTHOR");

    let edited = app
        .patch(&path, Some(&app.token_for(CREATOR)), json!({ "content": "edited" }))
        .await;
    assert_status(&edited, StatusCode::OK);
    assert_eq!(edited.body["content"], "edited");

    let rated = app
        .put(
            &format!("{path}/rating"),
            Some(&app.token_for(VIEWER)),
            Some(rate_body("like", None)),
        )
        .await;
    assert_eq!(rated.body["counts"]["likes"], 1);

    let deleted = app.delete(&path, Some(&app.token_for(CREATOR))).await;
    assert_status(&deleted, StatusCode::NO_CONTENT);

    let threads = app.get(&video_path(PUBLIC_VIDEO, "/comments"), None).await;
    assert_eq!(threads.body, json!([]));
    assert_eq!(app.backend.comment_ratings.row_count(), 0);
}

#[tokio::test]
async fn test_empty_comment_rejected() {
    let app = TestApp::seeded().await;
    let response = app
        .post(
            &video_path(PUBLIC_VIDEO, "/comments"),
            Some(&app.token_for(VIEWER)),
            Some(comment_body("", None)),
        )
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_engagement_events_published() {
    let app = TestApp::seeded().await;
    let token = app.token_for(VIEWER);

    app.put(
        &video_path(PUBLIC_VIDEO, "/rating"),
        Some(&token),
        Some(rate_body("like", None)),
    )
    .await;
    app.backend.notifier.set_failing(true);
    let response = app
        .put(
            &format!("/api/v1/channels/{CREATOR}/subscription"),
            Some(&token),
            None,
        )
        .await;
    assert_status(&response, StatusCode::OK);

    let events = app.backend.notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), "RATING_SET");
    assert_eq!(events[0].owner, Some(CREATOR));
}

// ============================================================================
// Middleware Tests
// ============================================================================

#[tokio::test]
async fn test_request_id_is_returned() {
    let app = TestApp::new();
    let response = app.get("/api/v1/users/@me/liked", None).await;
    assert_status(&response, StatusCode::UNAUTHORIZED);
    assert!(response.headers.contains_key("x-request-id"));
}
