//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use vidshare_core::entities::Comment;
use vidshare_core::traits::{CommentRepository, RepoResult};
use vidshare_core::value_objects::Snowflake;

use crate::mappers::CommentInsert;
use crate::models::CommentModel;

use super::error::{comment_not_found, map_db_error, map_write_error, ForeignRef};

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, video_id, user_id, content, parent_id, likes, dislikes,
                   created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find_by_video(&self, video_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, video_id, user_id, content, parent_id, likes, dislikes,
                   created_at, updated_at
            FROM comments
            WHERE video_id = $1
            "#,
        )
        .bind(video_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let insert = CommentInsert::new(comment);

        sqlx::query(
            r#"
            INSERT INTO comments (id, video_id, user_id, content, parent_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(insert.id)
        .bind(insert.video_id)
        .bind(insert.user_id)
        .bind(insert.content)
        .bind(insert.parent_id)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let mut refs = vec![
                ForeignRef::new("Video", "video_id", comment.video_id),
                ForeignRef::new("User", "user_id", comment.user_id),
            ];
            refs.extend(
                comment
                    .parent_id
                    .map(|parent| ForeignRef::new("Comment", "parent_id", parent)),
            );
            map_write_error(e, &refs)
        })?;

        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE comments SET content = $2, updated_at = $3 WHERE id = $1
            "#,
        )
        .bind(comment.id.into_inner())
        .bind(&comment.content)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(comment.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // Replies and ratings go with it (ON DELETE CASCADE)
        let result = sqlx::query(
            r#"
            DELETE FROM comments WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }

        Ok(())
    }
}
