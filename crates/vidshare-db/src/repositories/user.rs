//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use vidshare_core::entities::UserProfile;
use vidshare_core::error::DomainError;
use vidshare_core::traits::{PageQuery, ProfileRepository, RepoResult};
use vidshare_core::value_objects::Snowflake;

use crate::mappers::UserInsert;
use crate::models::UserModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserProfile>> {
        let result = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT id, display_name, email, photo_url, banner_url, bio,
                   subscriber_count, video_count, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserProfile::from))
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn create(&self, profile: &UserProfile) -> RepoResult<()> {
        let insert = UserInsert::new(profile);

        sqlx::query(
            r#"
            INSERT INTO users (id, display_name, email, photo_url, banner_url, bio,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            "#,
        )
        .bind(insert.id)
        .bind(insert.display_name)
        .bind(insert.email)
        .bind(insert.photo_url)
        .bind(insert.banner_url)
        .bind(insert.bio)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                DomainError::ValidationError("email already registered".to_string())
            }
            _ => map_db_error(e),
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_subscriptions(
        &self,
        subscriber_id: Snowflake,
        page: PageQuery,
    ) -> RepoResult<Vec<UserProfile>> {
        let results = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT u.id, u.display_name, u.email, u.photo_url, u.banner_url, u.bio,
                   u.subscriber_count, u.video_count, u.created_at, u.updated_at
            FROM subscriptions s
            INNER JOIN users u ON u.id = s.channel_id
            WHERE s.subscriber_id = $1
            ORDER BY s.created_at DESC, u.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(subscriber_id.into_inner())
        .bind(page.limit.max(0))
        .bind(page.offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(UserProfile::from).collect())
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn update(&self, profile: &UserProfile) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET display_name = $2, bio = $3, photo_url = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(profile.id.into_inner())
        .bind(&profile.display_name)
        .bind(profile.bio.as_deref())
        .bind(profile.photo_url.as_deref())
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ChannelNotFound(profile.id));
        }
        Ok(())
    }
}
