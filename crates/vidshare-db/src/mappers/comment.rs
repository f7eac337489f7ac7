//! Comment entity <-> model mapper

use vidshare_core::entities::Comment;
use vidshare_core::value_objects::Snowflake;

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            video_id: Snowflake::new(model.video_id),
            user_id: Snowflake::new(model.user_id),
            content: model.content,
            parent_id: model.parent_id.map(Snowflake::new),
            likes: model.likes,
            dislikes: model.dislikes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Comment values for database insertion
pub struct CommentInsert<'a> {
    pub id: i64,
    pub video_id: i64,
    pub user_id: i64,
    pub content: &'a str,
    pub parent_id: Option<i64>,
}

impl<'a> CommentInsert<'a> {
    pub fn new(comment: &'a Comment) -> Self {
        Self {
            id: comment.id.into_inner(),
            video_id: comment.video_id.into_inner(),
            user_id: comment.user_id.into_inner(),
            content: &comment.content,
            parent_id: comment.parent_id.map(Snowflake::into_inner),
        }
    }
}
