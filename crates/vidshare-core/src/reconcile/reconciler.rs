//! Toggle-set reconciler
//!
//! Maps a (subject, object, requested) action onto exactly one row mutation
//! of a [`DispositionStore`]:
//!
//! | current        | requested | mutation | effective |
//! |----------------|-----------|----------|-----------|
//! | `== requested` | D         | delete   | none      |
//! | none           | D         | insert   | D         |
//! | other value    | D         | upsert   | D         |
//!
//! Requests for one pair run one at a time behind a [`PairGuard`], and every
//! store call is bounded by a timeout that surfaces as `StoreUnavailable`.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::guard::{PairGuard, PairKey};
use super::plan::Mutation;
use crate::entities::Tally;
use crate::error::DomainError;
use crate::session::{require_subject, Session};
use crate::traits::{DispositionStore, RepoResult};
use crate::value_objects::{Disposition, Snowflake};

/// Default bound on a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one reconciled action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled<D: Disposition> {
    pub subject: Snowflake,
    pub object: Snowflake,
    /// Disposition stored for the pair after the call
    pub effective: Option<D>,
    pub mutation: Mutation<D>,
    /// Live counters read back with the mutation
    pub tally: Tally,
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    guard: PairGuard,
    store_timeout: Duration,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_TIMEOUT)
    }
}

impl Reconciler {
    pub fn new(store_timeout: Duration) -> Self {
        Self {
            guard: PairGuard::new(),
            store_timeout,
        }
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Pairs currently being reconciled
    pub fn in_flight(&self) -> usize {
        self.guard.active_pairs()
    }

    /// Apply `requested` given the caller's last known `current` value.
    ///
    /// An absent or inactive session fails with `Unauthenticated` before the
    /// store is touched.
    #[instrument(skip(self, store, session), fields(kind = %store.kind()))]
    pub async fn apply_disposition<D: Disposition>(
        &self,
        store: &dyn DispositionStore<D>,
        session: Option<&Session>,
        object: Snowflake,
        requested: D,
        current: Option<D>,
    ) -> Result<Reconciled<D>, DomainError> {
        let subject = require_subject(session)?;
        let _lease = self
            .guard
            .acquire(PairKey::new(store.kind(), subject, object))
            .await;

        self.reconcile(store, subject, object, requested, current)
            .await
    }

    /// Like [`apply_disposition`](Self::apply_disposition), reading the
    /// current value from the store under the pair guard first.
    #[instrument(skip(self, store, session), fields(kind = %store.kind()))]
    pub async fn toggle<D: Disposition>(
        &self,
        store: &dyn DispositionStore<D>,
        session: Option<&Session>,
        object: Snowflake,
        requested: D,
    ) -> Result<Reconciled<D>, DomainError> {
        let subject = require_subject(session)?;
        let _lease = self
            .guard
            .acquire(PairKey::new(store.kind(), subject, object))
            .await;

        let current = self.bounded(store.find(subject, object)).await?;
        self.reconcile(store, subject, object, requested, current)
            .await
    }

    /// Point lookup bounded by the store timeout
    pub async fn current<D: Disposition>(
        &self,
        store: &dyn DispositionStore<D>,
        subject: Snowflake,
        object: Snowflake,
    ) -> RepoResult<Option<D>> {
        self.bounded(store.find(subject, object)).await
    }

    /// Object counters bounded by the store timeout
    pub async fn tally<D: Disposition>(
        &self,
        store: &dyn DispositionStore<D>,
        object: Snowflake,
    ) -> RepoResult<Tally> {
        self.bounded(store.tally(object)).await
    }

    async fn reconcile<D: Disposition>(
        &self,
        store: &dyn DispositionStore<D>,
        subject: Snowflake,
        object: Snowflake,
        requested: D,
        current: Option<D>,
    ) -> Result<Reconciled<D>, DomainError> {
        let mutation = Mutation::plan(current, requested);

        match self.execute(store, subject, object, mutation).await {
            Err(DomainError::ConstraintViolation(detail)) => {
                // Another writer created the row after `current` was read
                warn!(%subject, %object, %detail, "constraint violation, re-reading pair");
                let fresh = self.bounded(store.find(subject, object)).await?;
                let mutation = Mutation::plan(fresh, requested);
                let tally = self.execute(store, subject, object, mutation).await?;
                Ok(self.finish(subject, object, mutation, tally))
            }
            result => {
                let tally = result?;
                Ok(self.finish(subject, object, mutation, tally))
            }
        }
    }

    async fn execute<D: Disposition>(
        &self,
        store: &dyn DispositionStore<D>,
        subject: Snowflake,
        object: Snowflake,
        mutation: Mutation<D>,
    ) -> RepoResult<Tally> {
        match mutation {
            Mutation::Insert(value) => self.bounded(store.insert(subject, object, value)).await,
            Mutation::Update(value) => self.bounded(store.upsert(subject, object, value)).await,
            Mutation::Delete => self.bounded(store.delete(subject, object)).await,
        }
    }

    fn finish<D: Disposition>(
        &self,
        subject: Snowflake,
        object: Snowflake,
        mutation: Mutation<D>,
        tally: Tally,
    ) -> Reconciled<D> {
        debug!(%subject, %object, mutation = mutation.as_str(), ?tally, "disposition reconciled");
        Reconciled {
            subject,
            object,
            effective: mutation.effective(),
            mutation,
            tally,
        }
    }

    async fn bounded<T, F>(&self, call: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                DomainError::StoreUnavailable(format!(
                    "store call exceeded {} ms",
                    self.store_timeout.as_millis()
                ))
            })?
    }
}
