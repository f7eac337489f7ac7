//! PostgreSQL implementation of PlaylistRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use vidshare_core::entities::Playlist;
use vidshare_core::error::DomainError;
use vidshare_core::traits::{PageQuery, PlaylistRepository, RepoResult};
use vidshare_core::value_objects::Snowflake;

use crate::models::PlaylistModel;

use super::error::{map_db_error, map_write_error, ForeignRef};

/// PostgreSQL implementation of PlaylistRepository
#[derive(Clone)]
pub struct PgPlaylistRepository {
    pool: PgPool,
}

impl PgPlaylistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaylistRepository for PgPlaylistRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Playlist>> {
        let result = sqlx::query_as::<_, PlaylistModel>(
            r#"
            SELECT id, user_id, title, description, visibility, created_at, updated_at
            FROM playlists
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Playlist::from))
    }

    #[instrument(skip(self, playlist), fields(playlist_id = %playlist.id))]
    async fn create(&self, playlist: &Playlist) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO playlists (id, user_id, title, description, visibility,
                                   created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(playlist.id.into_inner())
        .bind(playlist.user_id.into_inner())
        .bind(&playlist.title)
        .bind(&playlist.description)
        .bind(playlist.visibility.as_str())
        .bind(playlist.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, &[ForeignRef::new("User", "user_id", playlist.user_id)])
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page: PageQuery,
    ) -> RepoResult<Vec<Playlist>> {
        let results = sqlx::query_as::<_, PlaylistModel>(
            r#"
            SELECT id, user_id, title, description, visibility, created_at, updated_at
            FROM playlists
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(page.limit.max(0))
        .bind(page.offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Playlist::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PlaylistNotFound(id));
        }
        Ok(())
    }
}
