//! Comment service
//!
//! Comments and one-level replies on videos.

use tracing::{info, instrument};
use vidshare_core::{require_subject, thread_comments, Comment, DomainError, Session, Snowflake};

use crate::dto::{CommentResponse, CommentThreadResponse, CreateCommentRequest, UpdateCommentRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::video::visible_video;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Comments of a video as two-tier threads
    #[instrument(skip(self, session))]
    pub async fn list_comments(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
    ) -> ServiceResult<Vec<CommentThreadResponse>> {
        let viewer = session.and_then(|s| s.subject().ok());
        visible_video(self.ctx, video_id, viewer).await?;

        let comments = self.ctx.comment_repo().find_by_video(video_id).await?;
        Ok(thread_comments(comments)
            .into_iter()
            .map(CommentThreadResponse::from)
            .collect())
    }

    /// Post a top-level comment, or a reply when `parent_id` is set
    #[instrument(skip(self, session, request))]
    pub async fn create_comment(
        &self,
        session: Option<&Session>,
        video_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let author_id = require_subject(session)?;
        let content = Comment::normalize_content(&request.content)?;
        visible_video(self.ctx, video_id, Some(author_id)).await?;

        let comment_id = self.ctx.generate_id();
        let comment = match request.parent_id {
            Some(parent_id) => {
                let parent = self
                    .ctx
                    .comment_repo()
                    .find_by_id(parent_id)
                    .await?
                    .filter(|p| p.video_id == video_id)
                    .ok_or(DomainError::CommentNotFound(parent_id))?;
                if parent.is_reply() {
                    return Err(DomainError::NestedReply.into());
                }
                Comment::new_reply(comment_id, video_id, author_id, content, parent.id)
            }
            None => Comment::new(comment_id, video_id, author_id, content),
        };

        self.ctx.comment_repo().create(&comment).await?;

        info!(
            comment_id = %comment.id,
            video_id = %video_id,
            parent_id = ?comment.parent_id,
            "Comment created"
        );

        Ok(comment.into())
    }

    /// Edit own comment
    #[instrument(skip(self, session, request))]
    pub async fn update_comment(
        &self,
        session: Option<&Session>,
        comment_id: Snowflake,
        request: UpdateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let user_id = require_subject(session)?;
        let content = Comment::normalize_content(&request.content)?;

        let mut comment = self.owned_comment(comment_id, user_id).await?;
        comment.edit(content);
        self.ctx.comment_repo().update(&comment).await?;

        info!(comment_id = %comment_id, "Comment edited");

        Ok(comment.into())
    }

    /// Delete own comment together with its replies
    #[instrument(skip(self, session))]
    pub async fn delete_comment(
        &self,
        session: Option<&Session>,
        comment_id: Snowflake,
    ) -> ServiceResult<()> {
        let user_id = require_subject(session)?;

        self.owned_comment(comment_id, user_id).await?;
        self.ctx.comment_repo().delete(comment_id).await?;

        info!(comment_id = %comment_id, user_id = %user_id, "Comment deleted");

        Ok(())
    }

    async fn owned_comment(&self, comment_id: Snowflake, user_id: Snowflake) -> ServiceResult<Comment> {
        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        if !comment.is_authored_by(user_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }
        Ok(comment)
    }
}
