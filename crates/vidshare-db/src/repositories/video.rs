//! PostgreSQL implementation of VideoRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use vidshare_core::entities::Video;
use vidshare_core::traits::{PageQuery, RepoResult, VideoRepository};
use vidshare_core::value_objects::Snowflake;

use crate::mappers::VideoInsert;
use crate::models::VideoModel;

use super::error::{map_db_error, map_write_error, video_not_found, ForeignRef};

/// PostgreSQL implementation of VideoRepository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn recount_channel(tx: &mut Transaction<'_, Postgres>, user_id: i64) -> RepoResult<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET video_count = (SELECT COUNT(*) FROM videos WHERE user_id = $1), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .map_err(map_db_error)?;
    Ok(())
}

/// Escape LIKE wildcards so the query matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>> {
        let result = sqlx::query_as::<_, VideoModel>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url, duration,
                   visibility, views, likes, dislikes, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Video::from))
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn create(&self, video: &Video) -> RepoResult<()> {
        let insert = VideoInsert::new(video);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, title, description, thumbnail_url, video_url,
                                duration, visibility, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            "#,
        )
        .bind(insert.id)
        .bind(insert.user_id)
        .bind(insert.title)
        .bind(insert.description)
        .bind(insert.thumbnail_url)
        .bind(insert.video_url)
        .bind(insert.duration)
        .bind(insert.visibility)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_write_error(e, &[ForeignRef::new("Channel", "user_id", video.user_id)])
        })?;

        recount_channel(&mut tx, insert.user_id).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64> {
        let views = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        views.ok_or_else(|| video_not_found(id))
    }

    #[instrument(skip(self))]
    async fn find_liked_by_user(
        &self,
        user_id: Snowflake,
        page: PageQuery,
    ) -> RepoResult<Vec<Video>> {
        let results = sqlx::query_as::<_, VideoModel>(
            r#"
            SELECT v.id, v.user_id, v.title, v.description, v.thumbnail_url, v.video_url,
                   v.duration, v.visibility, v.views, v.likes, v.dislikes,
                   v.created_at, v.updated_at
            FROM video_likes vl
            INNER JOIN videos v ON v.id = vl.video_id
            WHERE vl.user_id = $1 AND vl.is_like = TRUE
            ORDER BY vl.created_at DESC, v.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(page.limit.max(0))
        .bind(page.offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Video::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_watch_later_by_user(
        &self,
        user_id: Snowflake,
        page: PageQuery,
    ) -> RepoResult<Vec<Video>> {
        let results = sqlx::query_as::<_, VideoModel>(
            r#"
            SELECT v.id, v.user_id, v.title, v.description, v.thumbnail_url, v.video_url,
                   v.duration, v.visibility, v.views, v.likes, v.dislikes,
                   v.created_at, v.updated_at
            FROM watch_later wl
            INNER JOIN videos v ON v.id = wl.video_id
            WHERE wl.user_id = $1
            ORDER BY wl.created_at DESC, v.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(page.limit.max(0))
        .bind(page.offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Video::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_public(&self, query: Option<&str>, page: PageQuery) -> RepoResult<Vec<Video>> {
        let pattern = query.map(like_pattern);
        let results = sqlx::query_as::<_, VideoModel>(
            r#"
            SELECT v.id, v.user_id, v.title, v.description, v.thumbnail_url, v.video_url,
                   v.duration, v.visibility, v.views, v.likes, v.dislikes,
                   v.created_at, v.updated_at
            FROM videos v
            INNER JOIN users u ON u.id = v.user_id
            WHERE v.visibility = 'public'
              AND ($1::TEXT IS NULL
                   OR v.title ILIKE $1
                   OR v.description ILIKE $1
                   OR u.display_name ILIKE $1)
            ORDER BY v.created_at DESC, v.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(page.limit.max(0))
        .bind(page.offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Video::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_channel(
        &self,
        user_id: Snowflake,
        public_only: bool,
        page: PageQuery,
    ) -> RepoResult<Vec<Video>> {
        let results = sqlx::query_as::<_, VideoModel>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url, duration,
                   visibility, views, likes, dislikes, created_at, updated_at
            FROM videos
            WHERE user_id = $1 AND (NOT $2 OR visibility = 'public')
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id.into_inner())
        .bind(public_only)
        .bind(page.limit.max(0))
        .bind(page.offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Video::from).collect())
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn update(&self, video: &Video) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2, description = $3, thumbnail_url = $4, visibility = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(video.id.into_inner())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(video.visibility.as_str())
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(video_not_found(video.id));
        }
        Ok(())
    }

    /// Ratings, watch-later rows and comments cascade through their foreign keys
    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let owner = sqlx::query_scalar::<_, i64>(
            r#"
            DELETE FROM videos WHERE id = $1 RETURNING user_id
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| video_not_found(id))?;

        recount_channel(&mut tx, owner).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
