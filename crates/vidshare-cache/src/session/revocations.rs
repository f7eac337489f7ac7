//! Signed-out session ids in Redis.
//!
//! Each revoked session is one key whose TTL ends when the session's token
//! expires, so the list never outgrows the set of still-valid tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use tracing::instrument;
use vidshare_core::{DomainError, RepoResult, SessionRevocations};

use crate::pool::{RedisPool, RedisPoolError};

/// Key prefix for revoked sessions
pub const REVOKED_SESSION_PREFIX: &str = "session:revoked:";

/// Revocation list stored in Redis
#[derive(Clone)]
pub struct RedisSessionRevocations {
    pool: RedisPool,
}

impl RedisSessionRevocations {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(session_id: &str) -> String {
        format!("{REVOKED_SESSION_PREFIX}{session_id}")
    }
}

/// Seconds until `expires_at`, or `None` once the token is already dead
fn remaining_ttl(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<u64> {
    u64::try_from((expires_at - now).num_seconds())
        .ok()
        .filter(|secs| *secs > 0)
}

fn to_domain(e: RedisPoolError) -> DomainError {
    match &e {
        RedisPoolError::GetConnection(_) => DomainError::StoreUnavailable(e.to_string()),
        RedisPoolError::Redis(err)
            if err.is_io_error() || err.is_timeout() || err.is_connection_dropped() =>
        {
            DomainError::StoreUnavailable(e.to_string())
        }
        _ => DomainError::CacheError(e.to_string()),
    }
}

#[async_trait]
impl SessionRevocations for RedisSessionRevocations {
    #[instrument(skip(self))]
    async fn revoke(&self, session_id: &str, expires_at: DateTime<Utc>) -> RepoResult<()> {
        let Some(ttl) = remaining_ttl(expires_at, Utc::now()) else {
            return Ok(());
        };

        let mut conn = self.pool.get().await.map_err(to_domain)?;
        conn.set_ex::<_, _, ()>(Self::key(session_id), 1u8, ttl)
            .await
            .map_err(|e| to_domain(e.into()))?;

        tracing::debug!(session_id = %session_id, ttl, "Revoked session");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_revoked(&self, session_id: &str) -> RepoResult<bool> {
        let mut conn = self.pool.get().await.map_err(to_domain)?;
        conn.exists(Self::key(session_id))
            .await
            .map_err(|e| to_domain(e.into()))
    }
}
