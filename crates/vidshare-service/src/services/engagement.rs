//! Engagement service
//!
//! Ratings, subscriptions and watch-later membership, all reconciled through
//! the toggle-set [`Reconciler`](vidshare_core::Reconciler).

use tracing::{info, instrument, warn};
use vidshare_core::traits::DispositionStore;
use vidshare_core::{
    require_subject, Disposition, DomainError, EngagementEvent, EngagementKind, Presence, Rating,
    Reconciled, Session, Snowflake, Tally, Video,
};

use crate::dto::{EngagementResponse, VideoEngagementResponse, ViewerEngagementResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::video::visible_video;

/// Engagement service
pub struct EngagementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Like or dislike a video.
    ///
    /// `current` is the rating the caller last saw; `None` reads it from the store.
    #[instrument(skip(self, session))]
    pub async fn rate_video(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
        rating: Rating,
        current: Option<Option<Rating>>,
    ) -> ServiceResult<EngagementResponse> {
        let subject = require_subject(session)?;
        let owner = self.unhidden_video(video_id, subject).await?;

        let reconciled = self
            .reconcile(self.ctx.video_ratings(), session, video_id, rating, current)
            .await?;

        self.publish(EngagementKind::VideoRating, &reconciled, owner)
            .await;

        Ok(EngagementResponse::from_reconciled(
            EngagementKind::VideoRating,
            &reconciled,
        ))
    }

    /// Like or dislike a comment
    #[instrument(skip(self, session))]
    pub async fn rate_comment(
        &self,
        session: Option<&Session>,
        comment_id: Snowflake,
        rating: Rating,
        current: Option<Option<Rating>>,
    ) -> ServiceResult<EngagementResponse> {
        let subject = require_subject(session)?;
        let comment = self.ctx.comment_repo().find_by_id(comment_id).await?;
        if let Some(comment) = &comment {
            let video = self.ctx.video_repo().find_by_id(comment.video_id).await?;
            if video.is_some_and(|v| !v.is_visible_to(Some(subject))) {
                return Err(DomainError::CommentNotFound(comment_id).into());
            }
        }

        let reconciled = self
            .reconcile(
                self.ctx.comment_ratings(),
                session,
                comment_id,
                rating,
                current,
            )
            .await?;

        let owner = comment.map(|c| c.user_id);
        self.publish(EngagementKind::CommentRating, &reconciled, owner)
            .await;

        Ok(EngagementResponse::from_reconciled(
            EngagementKind::CommentRating,
            &reconciled,
        ))
    }

    /// Subscribe to or unsubscribe from a channel.
    ///
    /// `current` is whether the caller last saw the subscription as present.
    #[instrument(skip(self, session))]
    pub async fn toggle_subscription(
        &self,
        session: Option<&Session>,
        channel_id: Snowflake,
        current: Option<bool>,
    ) -> ServiceResult<EngagementResponse> {
        let subscriber = require_subject(session)?;
        if subscriber == channel_id {
            return Err(DomainError::SelfSubscription.into());
        }

        let reconciled = self
            .reconcile(
                self.ctx.subscriptions(),
                session,
                channel_id,
                Presence::Present,
                current.map(presence),
            )
            .await?;

        self.publish(EngagementKind::Subscription, &reconciled, Some(channel_id))
            .await;

        Ok(EngagementResponse::from_reconciled(
            EngagementKind::Subscription,
            &reconciled,
        ))
    }

    /// Add a video to, or remove it from, the caller's watch-later list
    #[instrument(skip(self, session))]
    pub async fn toggle_watch_later(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
        current: Option<bool>,
    ) -> ServiceResult<EngagementResponse> {
        let subject = require_subject(session)?;
        self.unhidden_video(video_id, subject).await?;

        let reconciled = self
            .reconcile(
                self.ctx.watch_later(),
                session,
                video_id,
                Presence::Present,
                current.map(presence),
            )
            .await?;

        // The list is private: no owner fan-out
        self.publish(EngagementKind::WatchLater, &reconciled, None)
            .await;

        Ok(EngagementResponse::from_reconciled(
            EngagementKind::WatchLater,
            &reconciled,
        ))
    }

    /// Live counters of a video and, for a signed-in caller, their own state
    #[instrument(skip(self, session))]
    pub async fn video_engagement(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
    ) -> ServiceResult<VideoEngagementResponse> {
        let viewer = session.and_then(|s| s.subject().ok());
        let video = visible_video(self.ctx, video_id, viewer).await?;

        self.engagement_for(&video, viewer).await
    }

    /// Engagement view of an already loaded video
    pub(crate) async fn engagement_for(
        &self,
        video: &Video,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<VideoEngagementResponse> {
        let reconciler = self.ctx.reconciler();

        let (ratings, subscribers) = futures::try_join!(
            reconciler.tally(self.ctx.video_ratings(), video.id),
            reconciler.tally(self.ctx.subscriptions(), video.user_id),
        )?;

        let viewer_state = match viewer {
            Some(user_id) => {
                let (rating, subscribed, saved) = futures::try_join!(
                    reconciler.current(self.ctx.video_ratings(), user_id, video.id),
                    reconciler.current(self.ctx.subscriptions(), user_id, video.user_id),
                    reconciler.current(self.ctx.watch_later(), user_id, video.id),
                )?;
                Some(ViewerEngagementResponse {
                    rating,
                    subscribed: subscribed.is_some(),
                    watch_later: saved.is_some(),
                })
            }
            None => None,
        };

        let (likes, dislikes) = match ratings {
            Tally::Rating { likes, dislikes } => (likes, dislikes),
            Tally::Presence { .. } => (0, 0),
        };

        Ok(VideoEngagementResponse {
            video_id: video.id.to_string(),
            likes,
            dislikes,
            subscriber_count: subscribers.total(),
            viewer: viewer_state,
        })
    }

    async fn reconcile<D: Disposition>(
        &self,
        store: &dyn DispositionStore<D>,
        session: Option<&Session>,
        object: Snowflake,
        requested: D,
        current: Option<Option<D>>,
    ) -> ServiceResult<Reconciled<D>> {
        let reconciler = self.ctx.reconciler();
        let reconciled = match current {
            Some(current) => {
                reconciler
                    .apply_disposition(store, session, object, requested, current)
                    .await
            }
            None => reconciler.toggle(store, session, object, requested).await,
        }
        .map_err(ServiceError::from)?;

        info!(
            kind = %store.kind(),
            subject = %reconciled.subject,
            object = %object,
            mutation = reconciled.mutation.as_str(),
            "Engagement reconciled"
        );

        Ok(reconciled)
    }

    /// Refuse videos the caller may not see; returns the uploader when the
    /// video exists. A missing video is left to the store's reference check.
    async fn unhidden_video(
        &self,
        video_id: Snowflake,
        viewer: Snowflake,
    ) -> ServiceResult<Option<Snowflake>> {
        match self.ctx.video_repo().find_by_id(video_id).await? {
            Some(video) if !video.is_visible_to(Some(viewer)) => {
                Err(DomainError::VideoNotFound(video_id).into())
            }
            video => Ok(video.map(|v| v.user_id)),
        }
    }

    /// Best effort: a failed publish is logged, never surfaced
    async fn publish<D: Disposition>(
        &self,
        kind: EngagementKind,
        reconciled: &Reconciled<D>,
        owner: Option<Snowflake>,
    ) {
        let mut event = EngagementEvent::new(
            kind,
            reconciled.subject,
            reconciled.object,
            reconciled.effective,
            reconciled.tally,
        );
        if let Some(owner) = owner {
            event = event.with_owner(owner);
        }

        if let Err(e) = self.ctx.notifier().notify(&event).await {
            warn!(
                error = %e,
                event_type = event.event_type(),
                object = %event.object,
                "Failed to publish engagement event"
            );
        }
    }
}

fn presence(present: bool) -> Option<Presence> {
    present.then_some(Presence::Present)
}
