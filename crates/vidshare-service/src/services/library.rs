//! Library service
//!
//! The caller's liked videos, watch-later list and subscriptions.

use tracing::instrument;
use vidshare_core::{require_subject, PageQuery, Session, Video};

use crate::dto::{ChannelResponse, PaginatedResponse, VideoResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Library service
pub struct LibraryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LibraryService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Videos the caller liked, newest like first
    #[instrument(skip(self, session))]
    pub async fn liked_videos(
        &self,
        session: Option<&Session>,
        page: PageQuery,
    ) -> ServiceResult<PaginatedResponse<VideoResponse>> {
        let user_id = require_subject(session)?;
        let videos = self
            .ctx
            .video_repo()
            .find_liked_by_user(user_id, overfetch(page))
            .await?;
        Ok(video_page(videos, page, |v| v.is_visible_to(Some(user_id))))
    }

    /// The caller's watch-later list, newest first
    #[instrument(skip(self, session))]
    pub async fn watch_later_videos(
        &self,
        session: Option<&Session>,
        page: PageQuery,
    ) -> ServiceResult<PaginatedResponse<VideoResponse>> {
        let user_id = require_subject(session)?;
        let videos = self
            .ctx
            .video_repo()
            .find_watch_later_by_user(user_id, overfetch(page))
            .await?;
        Ok(video_page(videos, page, |v| v.is_visible_to(Some(user_id))))
    }

    /// Channels the caller subscribes to
    #[instrument(skip(self, session))]
    pub async fn subscriptions(
        &self,
        session: Option<&Session>,
        page: PageQuery,
    ) -> ServiceResult<PaginatedResponse<ChannelResponse>> {
        let user_id = require_subject(session)?;
        let channels = self
            .ctx
            .profile_repo()
            .find_subscriptions(user_id, overfetch(page))
            .await?;

        let channels = channels.into_iter().map(ChannelResponse::from).collect();
        Ok(PaginatedResponse::from_overfetch(
            channels,
            page.limit,
            page.offset,
        ))
    }
}

/// One extra row tells whether another page exists
pub(crate) fn overfetch(page: PageQuery) -> PageQuery {
    PageQuery {
        limit: page.limit.saturating_add(1),
        offset: page.offset,
    }
}

/// Page boundaries are decided before hiding videos that turned private
fn video_page(
    videos: Vec<Video>,
    page: PageQuery,
    visible: impl Fn(&Video) -> bool,
) -> PaginatedResponse<VideoResponse> {
    let fetched = PaginatedResponse::from_overfetch(videos, page.limit, page.offset);
    PaginatedResponse {
        data: fetched
            .data
            .into_iter()
            .filter(|v| visible(v))
            .map(VideoResponse::from)
            .collect(),
        pagination: fetched.pagination,
    }
}
