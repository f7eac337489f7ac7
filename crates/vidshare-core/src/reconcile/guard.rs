//! Per-pair serialization point

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::value_objects::{EngagementKind, Snowflake};

/// Identity of one disposition row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub kind: EngagementKind,
    pub subject: Snowflake,
    pub object: Snowflake,
}

impl PairKey {
    pub const fn new(kind: EngagementKind, subject: Snowflake, object: Snowflake) -> Self {
        Self {
            kind,
            subject,
            object,
        }
    }
}

type LockMap = DashMap<PairKey, Arc<Mutex<()>>>;

/// Async mutex per (kind, subject, object), created on demand
#[derive(Debug, Clone, Default)]
pub struct PairGuard {
    locks: Arc<LockMap>,
}

impl PairGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other request holds the pair
    pub async fn acquire(&self, key: PairKey) -> PairLease {
        let lock = self.locks.entry(key).or_default().value().clone();
        let guard = lock.lock_owned().await;
        PairLease {
            key,
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of pairs with a live lock entry
    pub fn active_pairs(&self) -> usize {
        self.locks.len()
    }
}

/// Held while a request mutates its pair; releases on drop
#[derive(Debug)]
pub struct PairLease {
    key: PairKey,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl PairLease {
    pub fn key(&self) -> PairKey {
        self.key
    }
}

impl Drop for PairLease {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own handle left: nobody holds or waits on this pair
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
