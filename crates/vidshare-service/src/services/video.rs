//! Video service
//!
//! Watch page data, view counting, the public feed, and the owner's
//! upload, edit and delete.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;
use vidshare_core::{require_subject, DomainError, PageQuery, Session, Snowflake, Video};

use crate::dto::{
    CreateVideoRequest, PaginatedResponse, SearchRequest, UpdateVideoRequest, VideoPageResponse,
    VideoResponse, ViewCountResponse,
};

use super::context::ServiceContext;
use super::engagement::EngagementService;
use super::error::ServiceResult;
use super::library::overfetch;

/// Load a video the viewer may see; private videos of others read as missing
pub(crate) async fn visible_video(
    ctx: &ServiceContext,
    video_id: Snowflake,
    viewer: Option<Snowflake>,
) -> ServiceResult<Video> {
    let video = ctx
        .video_repo()
        .find_by_id(video_id)
        .await?
        .filter(|v| v.is_visible_to(viewer))
        .ok_or(DomainError::VideoNotFound(video_id))?;
    Ok(video)
}

/// Video service
pub struct VideoService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VideoService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Video with its channel and live engagement
    #[instrument(skip(self, session))]
    pub async fn get_video(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
    ) -> ServiceResult<VideoPageResponse> {
        let viewer = session.and_then(|s| s.subject().ok());
        let video = visible_video(self.ctx, video_id, viewer).await?;

        let channel = self
            .ctx
            .profile_repo()
            .find_by_id(video.user_id)
            .await?
            .ok_or(DomainError::ChannelNotFound(video.user_id))?;

        let engagement = EngagementService::new(self.ctx)
            .engagement_for(&video, viewer)
            .await?;

        Ok(VideoPageResponse {
            video: video.into(),
            channel: channel.into(),
            engagement,
        })
    }

    /// Count one view
    #[instrument(skip(self, session))]
    pub async fn record_view(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
    ) -> ServiceResult<ViewCountResponse> {
        let viewer = session.and_then(|s| s.subject().ok());
        visible_video(self.ctx, video_id, viewer).await?;

        let views = self.ctx.video_repo().increment_views(video_id).await?;

        Ok(ViewCountResponse {
            video_id: video_id.to_string(),
            views,
        })
    }

    /// Register an uploaded video on the caller's channel
    #[instrument(skip(self, session, request))]
    pub async fn create_video(
        &self,
        session: Option<&Session>,
        request: CreateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        let user_id = require_subject(session)?;
        request.validate()?;

        let mut video = Video::new(
            self.ctx.generate_id(),
            user_id,
            request.title.trim().to_string(),
            request.video_url,
        );
        video.description = request.description;
        video.thumbnail_url = request.thumbnail_url;
        video.duration = request.duration;
        video.visibility = request.visibility;

        self.ctx.video_repo().create(&video).await?;

        info!(video_id = %video.id, user_id = %user_id, "Video created");

        Ok(video.into())
    }

    /// Public videos, newest first, optionally filtered by a search query
    #[instrument(skip(self, request))]
    pub async fn feed(
        &self,
        request: SearchRequest,
        page: PageQuery,
    ) -> ServiceResult<PaginatedResponse<VideoResponse>> {
        request.validate()?;
        let videos = self
            .ctx
            .video_repo()
            .find_public(request.query(), overfetch(page))
            .await?;

        let videos = videos.into_iter().map(VideoResponse::from).collect();
        Ok(PaginatedResponse::from_overfetch(
            videos,
            page.limit,
            page.offset,
        ))
    }

    /// The caller's own uploads of every visibility, newest first
    #[instrument(skip(self, session))]
    pub async fn my_videos(
        &self,
        session: Option<&Session>,
        page: PageQuery,
    ) -> ServiceResult<PaginatedResponse<VideoResponse>> {
        let user_id = require_subject(session)?;
        let videos = self
            .ctx
            .video_repo()
            .find_by_channel(user_id, false, overfetch(page))
            .await?;

        let videos = videos.into_iter().map(VideoResponse::from).collect();
        Ok(PaginatedResponse::from_overfetch(
            videos,
            page.limit,
            page.offset,
        ))
    }

    /// Edit title, description, thumbnail or visibility of an own video
    #[instrument(skip(self, session, request))]
    pub async fn update_video(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
        request: UpdateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        let user_id = require_subject(session)?;
        request.validate()?;
        let mut video = self.owned_video(video_id, user_id).await?;

        if let Some(title) = request.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::EmptyContent.into());
            }
            video.title = title;
        }
        if let Some(description) = request.description {
            video.description = description;
        }
        if let Some(thumbnail_url) = request.thumbnail_url {
            video.thumbnail_url = thumbnail_url;
        }
        if let Some(visibility) = request.visibility {
            video.visibility = visibility;
        }
        video.updated_at = Utc::now();

        self.ctx.video_repo().update(&video).await?;

        info!(video_id = %video_id, user_id = %user_id, "Video updated");

        Ok(video.into())
    }

    /// Delete an own video with its ratings, watch-later entries and comments
    #[instrument(skip(self, session))]
    pub async fn delete_video(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
    ) -> ServiceResult<()> {
        let user_id = require_subject(session)?;
        self.owned_video(video_id, user_id).await?;

        self.ctx.video_repo().delete(video_id).await?;

        info!(video_id = %video_id, user_id = %user_id, "Video deleted");

        Ok(())
    }

    /// Others' private videos read as missing; others' visible ones are forbidden
    async fn owned_video(&self, video_id: Snowflake, user_id: Snowflake) -> ServiceResult<Video> {
        let video = visible_video(self.ctx, video_id, Some(user_id)).await?;
        if video.user_id != user_id {
            return Err(DomainError::NotVideoOwner.into());
        }
        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use vidshare_common::JwtService;
    use vidshare_core::testing::MemoryBackend;
    use vidshare_core::{Rating, UserProfile, Visibility};

    use super::*;
    use crate::services::ServiceContextBuilder;

    const OWNER: Snowflake = Snowflake::new(1);
    const VIEWER: Snowflake = Snowflake::new(2);

    async fn setup_with_backend() -> (MemoryBackend, ServiceContext) {
        let backend = MemoryBackend::new();
        let ctx = ServiceContextBuilder::memory(&backend)
            .jwt_service(Arc::new(JwtService::new("secret", 60)))
            .build()
            .unwrap();
        ctx.profile_repo()
            .create(&UserProfile::new(OWNER, "Owner".into(), "o@x.io".into()))
            .await
            .unwrap();
        (backend, ctx)
    }

    async fn setup() -> ServiceContext {
        setup_with_backend().await.1
    }

    async fn upload(ctx: &ServiceContext, title: &str, visibility: Visibility) -> Snowflake {
        let mut request = create_request(visibility);
        request.title = title.into();
        let created = VideoService::new(ctx)
            .create_video(Some(&session(OWNER)), request)
            .await
            .unwrap();
        Snowflake::new(created.id.parse().unwrap())
    }

    fn search(q: &str) -> SearchRequest {
        SearchRequest {
            q: Some(q.into()),
        }
    }

    fn session(user: Snowflake) -> Session {
        let now = Utc::now();
        Session::new("s", user, now, now + chrono::Duration::minutes(5))
    }

    fn create_request(visibility: Visibility) -> CreateVideoRequest {
        CreateVideoRequest {
            title: " Clip ".into(),
            description: String::new(),
            video_url: "https://cdn.example.com/clip.mp4".into(),
            thumbnail_url: String::new(),
            duration: "1:00".into(),
            visibility,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_video() {
        let ctx = setup().await;
        let service = VideoService::new(&ctx);

        let created = service
            .create_video(Some(&session(OWNER)), create_request(Visibility::Public))
            .await
            .unwrap();
        assert_eq!(created.title, "Clip");
        let video_id = Snowflake::new(created.id.parse().unwrap());

        EngagementService::new(&ctx)
            .rate_video(Some(&session(VIEWER)), video_id, Rating::Like, None)
            .await
            .unwrap();

        let page = service
            .get_video(Some(&session(VIEWER)), video_id)
            .await
            .unwrap();
        assert_eq!(page.channel.display_name, "Owner");
        assert_eq!(page.video.likes, 1);
        assert_eq!(page.engagement.likes, 1);
        assert_eq!(
            page.engagement.viewer.as_ref().and_then(|v| v.rating),
            Some(Rating::Like)
        );
    }

    #[tokio::test]
    async fn test_create_video_requires_session_and_valid_url() {
        let ctx = setup().await;
        let service = VideoService::new(&ctx);

        let err = service
            .create_video(None, create_request(Visibility::Public))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);

        let mut bad = create_request(Visibility::Public);
        bad.video_url = "not a url".into();
        let err = service
            .create_video(Some(&session(OWNER)), bad)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_record_view_counts() {
        let ctx = setup().await;
        let service = VideoService::new(&ctx);
        let created = service
            .create_video(Some(&session(OWNER)), create_request(Visibility::Unlisted))
            .await
            .unwrap();
        let video_id = Snowflake::new(created.id.parse().unwrap());

        for expected in 1..=3 {
            let views = service.record_view(None, video_id).await.unwrap();
            assert_eq!(views.views, expected);
        }

        let err = service
            .record_view(None, Snowflake::new(999))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_private_video_only_for_owner() {
        let ctx = setup().await;
        let service = VideoService::new(&ctx);
        let created = service
            .create_video(Some(&session(OWNER)), create_request(Visibility::Private))
            .await
            .unwrap();
        let video_id = Snowflake::new(created.id.parse().unwrap());

        assert_eq!(
            service.get_video(None, video_id).await.unwrap_err().status_code(),
            404
        );
        assert_eq!(
            service
                .get_video(Some(&session(VIEWER)), video_id)
                .await
                .unwrap_err()
                .status_code(),
            404
        );
        assert!(service.get_video(Some(&session(OWNER)), video_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_feed_is_public_newest_first_and_searchable() {
        let ctx = setup().await;
        upload(&ctx, "Cats playing", Visibility::Public).await;
        upload(&ctx, "Dogs", Visibility::Public).await;
        upload(&ctx, "Secret cats", Visibility::Private).await;
        upload(&ctx, "Unlisted cats", Visibility::Unlisted).await;
        let service = VideoService::new(&ctx);

        let feed = service
            .feed(SearchRequest::default(), PageQuery::default())
            .await
            .unwrap();
        let titles: Vec<_> = feed.data.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["Dogs", "Cats playing"]);

        let cats = service
            .feed(search("  CATS "), PageQuery::default())
            .await
            .unwrap();
        assert_eq!(cats.data.len(), 1);
        assert_eq!(cats.data[0].title, "Cats playing");

        // The channel name matches too
        let by_channel = service
            .feed(search("owner"), PageQuery::default())
            .await
            .unwrap();
        assert_eq!(by_channel.data.len(), 2);

        let first = service
            .feed(SearchRequest::default(), PageQuery { limit: 1, offset: 0 })
            .await
            .unwrap();
        assert!(first.pagination.has_more);

        let err = service
            .feed(search(&"x".repeat(101)), PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_my_videos_include_private() {
        let ctx = setup().await;
        upload(&ctx, "Public", Visibility::Public).await;
        upload(&ctx, "Private", Visibility::Private).await;
        let service = VideoService::new(&ctx);

        let mine = service
            .my_videos(Some(&session(OWNER)), PageQuery::default())
            .await
            .unwrap();
        let titles: Vec<_> = mine.data.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["Private", "Public"]);

        let theirs = service
            .my_videos(Some(&session(VIEWER)), PageQuery::default())
            .await
            .unwrap();
        assert!(theirs.data.is_empty());

        let err = service
            .my_videos(None, PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_only_owner_edits_video() {
        let ctx = setup().await;
        let video_id = upload(&ctx, "Draft", Visibility::Public).await;
        let service = VideoService::new(&ctx);

        let edit = UpdateVideoRequest {
            title: Some(" Final ".into()),
            visibility: Some(Visibility::Unlisted),
            ..UpdateVideoRequest::default()
        };
        let err = service
            .update_video(Some(&session(VIEWER)), video_id, edit.clone())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "NOT_VIDEO_OWNER");

        let updated = service
            .update_video(Some(&session(OWNER)), video_id, edit)
            .await
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.visibility, Visibility::Unlisted);
        let stored = ctx.video_repo().find_by_id(video_id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Final");

        // Once private, the video is not even acknowledged to others
        service
            .update_video(
                Some(&session(OWNER)),
                video_id,
                UpdateVideoRequest {
                    visibility: Some(Visibility::Private),
                    ..UpdateVideoRequest::default()
                },
            )
            .await
            .unwrap();
        let err = service
            .update_video(
                Some(&session(VIEWER)),
                video_id,
                UpdateVideoRequest::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_VIDEO");

        let blank = UpdateVideoRequest {
            title: Some("   ".into()),
            ..UpdateVideoRequest::default()
        };
        let err = service
            .update_video(Some(&session(OWNER)), video_id, blank)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_delete_video_cascades() {
        let (backend, ctx) = setup_with_backend().await;
        let video_id = upload(&ctx, "Doomed", Visibility::Public).await;
        let engagement = EngagementService::new(&ctx);
        engagement
            .rate_video(Some(&session(VIEWER)), video_id, Rating::Like, None)
            .await
            .unwrap();
        engagement
            .toggle_watch_later(Some(&session(VIEWER)), video_id, None)
            .await
            .unwrap();
        ctx.comment_repo()
            .create(&vidshare_core::Comment::new(
                Snowflake::new(500),
                video_id,
                VIEWER,
                "bye".into(),
            ))
            .await
            .unwrap();
        let channel = ctx.profile_repo().find_by_id(OWNER).await.unwrap().unwrap();
        assert_eq!(channel.video_count, 1);

        let service = VideoService::new(&ctx);
        let err = service
            .delete_video(Some(&session(VIEWER)), video_id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        service
            .delete_video(Some(&session(OWNER)), video_id)
            .await
            .unwrap();

        assert_eq!(backend.video_ratings.rows_for(video_id), 0);
        assert_eq!(backend.watch_later.rows_for(video_id), 0);
        assert!(backend.comments.is_empty());
        let channel = ctx.profile_repo().find_by_id(OWNER).await.unwrap().unwrap();
        assert_eq!(channel.video_count, 0);
        assert_eq!(
            service.get_video(None, video_id).await.unwrap_err().status_code(),
            404
        );

        // Engagement with the deleted video hits the reference check
        let err = engagement
            .rate_video(Some(&session(VIEWER)), video_id, Rating::Like, None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = service
            .delete_video(Some(&session(OWNER)), video_id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
