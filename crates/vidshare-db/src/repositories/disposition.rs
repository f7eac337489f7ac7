//! PostgreSQL disposition stores
//!
//! Each mutation runs in one transaction:
//! 1. lock the object row (`FOR UPDATE`), which also detects dangling references
//! 2. apply the single row mutation
//! 3. recount the object's rows and write the denormalized counters
//!
//! Locking the object first serializes writers per object, so the recount
//! always sees every committed row.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use vidshare_core::entities::Tally;
use vidshare_core::error::DomainError;
use vidshare_core::traits::{DispositionStore, RepoResult};
use vidshare_core::value_objects::{EngagementKind, Presence, Rating, Snowflake};

use crate::models::{PresenceTallyModel, RatingTallyModel};

use super::error::{map_db_error, map_write_error, ForeignRef};

/// Denormalized counter columns on the object table
#[derive(Debug, Clone, Copy)]
pub enum Counters {
    Rating {
        likes: &'static str,
        dislikes: &'static str,
    },
    Count(&'static str),
    /// Counted on read only
    None,
}

/// Layout of one disposition table
#[derive(Debug)]
pub struct PairTable {
    pub kind: EngagementKind,
    pub table: &'static str,
    pub subject_column: &'static str,
    pub object_column: &'static str,
    pub object_table: &'static str,
    pub counters: Counters,
}

pub const VIDEO_LIKES: PairTable = PairTable {
    kind: EngagementKind::VideoRating,
    table: "video_likes",
    subject_column: "user_id",
    object_column: "video_id",
    object_table: "videos",
    counters: Counters::Rating {
        likes: "likes",
        dislikes: "dislikes",
    },
};

pub const COMMENT_LIKES: PairTable = PairTable {
    kind: EngagementKind::CommentRating,
    table: "comment_likes",
    subject_column: "user_id",
    object_column: "comment_id",
    object_table: "comments",
    counters: Counters::Rating {
        likes: "likes",
        dislikes: "dislikes",
    },
};

pub const SUBSCRIPTIONS: PairTable = PairTable {
    kind: EngagementKind::Subscription,
    table: "subscriptions",
    subject_column: "subscriber_id",
    object_column: "channel_id",
    object_table: "users",
    counters: Counters::Count("subscriber_count"),
};

pub const WATCH_LATER: PairTable = PairTable {
    kind: EngagementKind::WatchLater,
    table: "watch_later",
    subject_column: "user_id",
    object_column: "video_id",
    object_table: "videos",
    counters: Counters::None,
};

/// SQL rendered once per store from its [`PairTable`]
#[derive(Debug)]
struct PairSql {
    lock_object: String,
    find: String,
    insert: String,
    upsert: String,
    delete: String,
    count: String,
    write_counters: Option<String>,
}

impl PairSql {
    fn render(t: &PairTable, rated: bool) -> Self {
        let (s, o, table) = (t.subject_column, t.object_column, t.table);
        let pair = format!("{s} = $1 AND {o} = $2");

        let (find, insert, upsert, count) = if rated {
            (
                format!("SELECT is_like FROM {table} WHERE {pair}"),
                format!("INSERT INTO {table} ({s}, {o}, is_like) VALUES ($1, $2, $3)"),
                format!(
                    "INSERT INTO {table} ({s}, {o}, is_like) VALUES ($1, $2, $3) \
                     ON CONFLICT ({s}, {o}) DO UPDATE SET is_like = EXCLUDED.is_like"
                ),
                format!(
                    "SELECT COUNT(*) FILTER (WHERE is_like) AS likes, \
                     COUNT(*) FILTER (WHERE NOT is_like) AS dislikes \
                     FROM {table} WHERE {o} = $1"
                ),
            )
        } else {
            (
                format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {pair})"),
                format!("INSERT INTO {table} ({s}, {o}) VALUES ($1, $2)"),
                format!(
                    "INSERT INTO {table} ({s}, {o}) VALUES ($1, $2) \
                     ON CONFLICT ({s}, {o}) DO NOTHING"
                ),
                format!("SELECT COUNT(*) AS count FROM {table} WHERE {o} = $1"),
            )
        };

        let write_counters = match t.counters {
            Counters::Rating { likes, dislikes } => Some(format!(
                "UPDATE {} SET {likes} = $2, {dislikes} = $3 WHERE id = $1",
                t.object_table
            )),
            Counters::Count(column) => Some(format!(
                "UPDATE {} SET {column} = $2 WHERE id = $1",
                t.object_table
            )),
            Counters::None => None,
        };

        Self {
            lock_object: format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", t.object_table),
            find,
            insert,
            upsert,
            delete: format!("DELETE FROM {table} WHERE {pair}"),
            count,
            write_counters,
        }
    }
}

/// Shared transaction plumbing of the rating and presence stores
#[derive(Debug)]
struct PairStore {
    pool: PgPool,
    table: &'static PairTable,
    sql: PairSql,
    rated: bool,
}

impl PairStore {
    fn new(pool: PgPool, table: &'static PairTable, rated: bool) -> Self {
        Self {
            pool,
            table,
            sql: PairSql::render(table, rated),
            rated,
        }
    }

    fn object_name(&self) -> &'static str {
        self.table.kind.object_name()
    }

    /// Run one row mutation plus the counter recompute atomically
    async fn mutate(
        &self,
        statement: &str,
        subject: Snowflake,
        object: Snowflake,
        is_like: Option<bool>,
    ) -> RepoResult<Tally> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let locked = sqlx::query_scalar::<_, i64>(&self.sql.lock_object)
            .bind(object.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;
        if locked.is_none() {
            return Err(DomainError::reference(self.object_name(), object));
        }

        let mut query = sqlx::query(statement)
            .bind(subject.into_inner())
            .bind(object.into_inner());
        if let Some(is_like) = is_like {
            query = query.bind(is_like);
        }
        query
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_write_error(
                    e,
                    &[
                        ForeignRef::new(self.object_name(), self.table.object_column, object),
                        ForeignRef::new("User", self.table.subject_column, subject),
                    ],
                )
            })?;

        let tally = self.recount(&mut tx, object).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(tally)
    }

    async fn recount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        object: Snowflake,
    ) -> RepoResult<Tally> {
        let tally: Tally = if self.rated {
            sqlx::query_as::<_, RatingTallyModel>(&self.sql.count)
                .bind(object.into_inner())
                .fetch_one(&mut **tx)
                .await
                .map_err(map_db_error)?
                .into()
        } else {
            sqlx::query_as::<_, PresenceTallyModel>(&self.sql.count)
                .bind(object.into_inner())
                .fetch_one(&mut **tx)
                .await
                .map_err(map_db_error)?
                .into()
        };

        if let Some(write_counters) = &self.sql.write_counters {
            let query = sqlx::query(write_counters).bind(object.into_inner());
            let query = match tally {
                Tally::Rating { likes, dislikes } => query.bind(likes).bind(dislikes),
                Tally::Presence { count } => query.bind(count),
            };
            query.execute(&mut **tx).await.map_err(map_db_error)?;
        }

        Ok(tally)
    }

    async fn tally(&self, object: Snowflake) -> RepoResult<Tally> {
        if self.rated {
            let model = sqlx::query_as::<_, RatingTallyModel>(&self.sql.count)
                .bind(object.into_inner())
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;
            Ok(model.into())
        } else {
            let model = sqlx::query_as::<_, PresenceTallyModel>(&self.sql.count)
                .bind(object.into_inner())
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;
            Ok(model.into())
        }
    }
}

// ============================================================================
// Ratings
// ============================================================================

/// Like/dislike table (`video_likes`, `comment_likes`)
#[derive(Debug)]
pub struct PgRatingStore {
    inner: PairStore,
}

impl PgRatingStore {
    pub fn new(pool: PgPool, table: &'static PairTable) -> Self {
        Self {
            inner: PairStore::new(pool, table, true),
        }
    }

    pub fn videos(pool: PgPool) -> Self {
        Self::new(pool, &VIDEO_LIKES)
    }

    pub fn comments(pool: PgPool) -> Self {
        Self::new(pool, &COMMENT_LIKES)
    }
}

#[async_trait]
impl DispositionStore<Rating> for PgRatingStore {
    fn kind(&self) -> EngagementKind {
        self.inner.table.kind
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn find(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Option<Rating>> {
        let is_like = sqlx::query_scalar::<_, bool>(&self.inner.sql.find)
            .bind(subject.into_inner())
            .bind(object.into_inner())
            .fetch_optional(&self.inner.pool)
            .await
            .map_err(map_db_error)?;

        Ok(is_like.map(Rating::from_is_like))
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn insert(&self, subject: Snowflake, object: Snowflake, value: Rating) -> RepoResult<Tally> {
        self.inner
            .mutate(&self.inner.sql.insert, subject, object, Some(value.is_like()))
            .await
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn upsert(&self, subject: Snowflake, object: Snowflake, value: Rating) -> RepoResult<Tally> {
        self.inner
            .mutate(&self.inner.sql.upsert, subject, object, Some(value.is_like()))
            .await
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn delete(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Tally> {
        self.inner
            .mutate(&self.inner.sql.delete, subject, object, None)
            .await
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn tally(&self, object: Snowflake) -> RepoResult<Tally> {
        self.inner.tally(object).await
    }
}

// ============================================================================
// Presence
// ============================================================================

/// Row-exists table (`subscriptions`, `watch_later`)
#[derive(Debug)]
pub struct PgPresenceStore {
    inner: PairStore,
}

impl PgPresenceStore {
    pub fn new(pool: PgPool, table: &'static PairTable) -> Self {
        Self {
            inner: PairStore::new(pool, table, false),
        }
    }

    pub fn subscriptions(pool: PgPool) -> Self {
        Self::new(pool, &SUBSCRIPTIONS)
    }

    pub fn watch_later(pool: PgPool) -> Self {
        Self::new(pool, &WATCH_LATER)
    }
}

#[async_trait]
impl DispositionStore<Presence> for PgPresenceStore {
    fn kind(&self) -> EngagementKind {
        self.inner.table.kind
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn find(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Option<Presence>> {
        let exists = sqlx::query_scalar::<_, bool>(&self.inner.sql.find)
            .bind(subject.into_inner())
            .bind(object.into_inner())
            .fetch_one(&self.inner.pool)
            .await
            .map_err(map_db_error)?;

        Ok(exists.then_some(Presence::Present))
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn insert(
        &self,
        subject: Snowflake,
        object: Snowflake,
        _value: Presence,
    ) -> RepoResult<Tally> {
        self.inner
            .mutate(&self.inner.sql.insert, subject, object, None)
            .await
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn upsert(
        &self,
        subject: Snowflake,
        object: Snowflake,
        _value: Presence,
    ) -> RepoResult<Tally> {
        self.inner
            .mutate(&self.inner.sql.upsert, subject, object, None)
            .await
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn delete(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Tally> {
        self.inner
            .mutate(&self.inner.sql.delete, subject, object, None)
            .await
    }

    #[instrument(skip(self), fields(table = self.inner.table.table))]
    async fn tally(&self, object: Snowflake) -> RepoResult<Tally> {
        self.inner.tally(object).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stores_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgRatingStore>();
        assert_send_sync::<PgPresenceStore>();
    }

    #[test]
    fn test_rating_sql() {
        let sql = PairSql::render(&VIDEO_LIKES, true);
        assert_eq!(
            sql.find,
            "SELECT is_like FROM video_likes WHERE user_id = $1 AND video_id = $2"
        );
        assert!(sql.upsert.ends_with(
            "ON CONFLICT (user_id, video_id) DO UPDATE SET is_like = EXCLUDED.is_like"
        ));
        assert_eq!(
            sql.write_counters.as_deref(),
            Some("UPDATE videos SET likes = $2, dislikes = $3 WHERE id = $1")
        );
        assert_eq!(sql.lock_object, "SELECT id FROM videos WHERE id = $1 FOR UPDATE");
    }

    #[test]
    fn test_presence_sql() {
        let sql = PairSql::render(&SUBSCRIPTIONS, false);
        assert_eq!(
            sql.insert,
            "INSERT INTO subscriptions (subscriber_id, channel_id) VALUES ($1, $2)"
        );
        assert_eq!(
            sql.count,
            "SELECT COUNT(*) AS count FROM subscriptions WHERE channel_id = $1"
        );
        assert_eq!(
            sql.write_counters.as_deref(),
            Some("UPDATE users SET subscriber_count = $2 WHERE id = $1")
        );

        let sql = PairSql::render(&WATCH_LATER, false);
        assert!(sql.write_counters.is_none());
        assert_eq!(sql.delete, "DELETE FROM watch_later WHERE user_id = $1 AND video_id = $2");
    }
}
