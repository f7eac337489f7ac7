//! In-memory session revocation list

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::lock;
use crate::error::DomainError;
use crate::traits::{RepoResult, SessionRevocations};

/// Revoked session ids with their expiry; expired entries read as absent,
/// like a key whose TTL ran out
#[derive(Debug, Default)]
pub struct MemorySessionRevocations {
    revoked: Mutex<HashMap<String, DateTime<Utc>>>,
    unavailable: AtomicBool,
}

impl MemorySessionRevocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, on: bool) {
        self.unavailable.store(on, Ordering::SeqCst);
    }

    /// Entries that have not expired yet
    pub fn live_count(&self) -> usize {
        let now = Utc::now();
        lock(&self.revoked).values().filter(|exp| **exp > now).count()
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable("revocation list offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRevocations for MemorySessionRevocations {
    async fn revoke(&self, session_id: &str, expires_at: DateTime<Utc>) -> RepoResult<()> {
        self.check_available()?;
        let now = Utc::now();
        let mut revoked = lock(&self.revoked);
        revoked.retain(|_, exp| *exp > now);
        if expires_at > now {
            revoked.insert(session_id.to_string(), expires_at);
        }
        Ok(())
    }

    async fn is_revoked(&self, session_id: &str) -> RepoResult<bool> {
        self.check_available()?;
        Ok(lock(&self.revoked)
            .get(session_id)
            .is_some_and(|exp| *exp > Utc::now()))
    }
}
