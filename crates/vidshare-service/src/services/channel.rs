//! Channel service
//!
//! Channel pages and the caller's own profile.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;
use vidshare_core::{require_subject, DomainError, PageQuery, Session, Snowflake};

use crate::dto::{
    ChannelPageResponse, ChannelResponse, PaginatedResponse, UpdateProfileRequest, VideoResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::library::overfetch;

pub struct ChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Profile, public uploads newest first, and whether the viewer subscribes
    #[instrument(skip(self, session))]
    pub async fn get_channel(
        &self,
        session: Option<&Session>,
        channel_id: Snowflake,
        page: PageQuery,
    ) -> ServiceResult<ChannelPageResponse> {
        let viewer = session.and_then(|s| s.subject().ok());

        let channel = self
            .ctx
            .profile_repo()
            .find_by_id(channel_id)
            .await?
            .ok_or(DomainError::ChannelNotFound(channel_id))?;

        let videos = self
            .ctx
            .video_repo()
            .find_by_channel(channel_id, true, overfetch(page))
            .await?;
        let videos = videos.into_iter().map(VideoResponse::from).collect();

        let subscribed = match viewer {
            Some(viewer) if viewer != channel_id => Some(
                self.ctx
                    .subscriptions()
                    .find(viewer, channel_id)
                    .await?
                    .is_some(),
            ),
            _ => None,
        };

        Ok(ChannelPageResponse {
            channel: channel.into(),
            videos: PaginatedResponse::from_overfetch(videos, page.limit, page.offset),
            subscribed,
        })
    }

    /// Edit display name, bio or photo of the caller's channel
    #[instrument(skip(self, session, request))]
    pub async fn update_profile(
        &self,
        session: Option<&Session>,
        request: UpdateProfileRequest,
    ) -> ServiceResult<ChannelResponse> {
        let user_id = require_subject(session)?;
        request.validate()?;

        let mut profile = self
            .ctx
            .profile_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::ChannelNotFound(user_id))?;

        if let Some(name) = request.display_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::EmptyContent.into());
            }
            profile.display_name = name;
        }
        if let Some(bio) = request.bio {
            profile.bio = Some(bio).filter(|b| !b.trim().is_empty());
        }
        if let Some(photo_url) = request.photo_url {
            profile.photo_url = Some(photo_url);
        }
        profile.updated_at = Utc::now();

        self.ctx.profile_repo().update(&profile).await?;

        info!(user_id = %user_id, "Profile updated");

        Ok(profile.into())
    }
}
