//! In-memory disposition table with fault injection

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::lock;
use crate::entities::{EngagementRow, Tally};
use crate::error::DomainError;
use crate::traits::{DispositionStore, RepoResult};
use crate::value_objects::{Disposition, EngagementKind, Snowflake};

#[derive(Debug)]
struct StoredRow<D: Disposition> {
    row: EngagementRow<D>,
    seq: u64,
}

#[derive(Debug)]
struct Faults<D> {
    /// Value a competing writer slips in right before the next insert
    racing_insert: Option<D>,
    /// Every insert collides
    always_conflict: bool,
    unavailable: bool,
    latency: Option<Duration>,
}

impl<D> Default for Faults<D> {
    fn default() -> Self {
        Self {
            racing_insert: None,
            always_conflict: false,
            unavailable: false,
            latency: None,
        }
    }
}

/// Disposition table kept in memory.
///
/// Tallies are always counted from the rows, like the transactional
/// recompute of the SQL stores.
#[derive(Debug)]
pub struct MemoryDispositionStore<D: Disposition> {
    kind: EngagementKind,
    rows: Mutex<HashMap<(Snowflake, Snowflake), StoredRow<D>>>,
    /// When set, objects outside the set fail with `ReferenceError`
    objects: Mutex<Option<HashSet<Snowflake>>>,
    faults: Mutex<Faults<D>>,
    mutations: AtomicUsize,
    sequence: AtomicU64,
}

impl<D: Disposition> MemoryDispositionStore<D> {
    /// Store that accepts any object id
    pub fn new(kind: EngagementKind) -> Self {
        Self {
            kind,
            rows: Mutex::new(HashMap::new()),
            objects: Mutex::new(None),
            faults: Mutex::new(Faults::default()),
            mutations: AtomicUsize::new(0),
            sequence: AtomicU64::new(0),
        }
    }

    /// Store that enforces referential integrity against registered objects
    pub fn with_known_objects(kind: EngagementKind) -> Self {
        let store = Self::new(kind);
        *lock(&store.objects) = Some(HashSet::new());
        store
    }

    pub fn register_object(&self, object: Snowflake) {
        if let Some(objects) = lock(&self.objects).as_mut() {
            objects.insert(object);
        }
    }

    /// Drop an object and its rows (foreign-key cascade)
    pub fn purge_object(&self, object: Snowflake) {
        if let Some(objects) = lock(&self.objects).as_mut() {
            objects.remove(&object);
        }
        lock(&self.rows).retain(|(_, o), _| *o != object);
    }

    // ------------------------------------------------------------------
    // Fault injection
    // ------------------------------------------------------------------

    /// Make the next insert lose a race against a writer storing `value`
    pub fn race_next_insert(&self, value: D) {
        lock(&self.faults).racing_insert = Some(value);
    }

    pub fn set_always_conflict(&self, on: bool) {
        lock(&self.faults).always_conflict = on;
    }

    pub fn set_unavailable(&self, on: bool) {
        lock(&self.faults).unavailable = on;
    }

    pub fn set_latency(&self, latency: Option<Duration>) {
        lock(&self.faults).latency = latency;
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn get(&self, subject: Snowflake, object: Snowflake) -> Option<D> {
        lock(&self.rows)
            .get(&(subject, object))
            .map(|stored| stored.row.disposition)
    }

    /// Number of rows stored for an object
    pub fn rows_for(&self, object: Snowflake) -> usize {
        lock(&self.rows)
            .keys()
            .filter(|(_, o)| *o == object)
            .count()
    }

    /// Counters of an object, bypassing fault injection
    pub fn tally_now(&self, object: Snowflake) -> Tally {
        Self::count(&lock(&self.rows), object)
    }

    pub fn row_count(&self) -> usize {
        lock(&self.rows).len()
    }

    /// Successful row mutations so far
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Rows of a subject, newest first
    pub fn rows_by_subject(&self, subject: Snowflake) -> Vec<EngagementRow<D>> {
        let rows = lock(&self.rows);
        let mut mine: Vec<_> = rows
            .values()
            .filter(|stored| stored.row.subject == subject)
            .collect();
        mine.sort_by(|a, b| b.seq.cmp(&a.seq));
        mine.into_iter().map(|stored| stored.row.clone()).collect()
    }

    // ------------------------------------------------------------------

    async fn enter(&self, object: Option<Snowflake>) -> RepoResult<()> {
        let (unavailable, latency) = {
            let faults = lock(&self.faults);
            (faults.unavailable, faults.latency)
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if unavailable {
            return Err(DomainError::StoreUnavailable("memory store offline".into()));
        }
        if let Some(object) = object {
            let known = lock(&self.objects)
                .as_ref()
                .map_or(true, |objects| objects.contains(&object));
            if !known {
                return Err(DomainError::reference(self.kind.object_name(), object));
            }
        }
        Ok(())
    }

    fn write(&self, subject: Snowflake, object: Snowflake, value: D) -> Tally {
        let mut rows = lock(&self.rows);
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let row = EngagementRow {
            subject,
            object,
            disposition: value,
            created_at: Utc::now(),
        };
        rows.entry((subject, object))
            .and_modify(|stored| stored.row.disposition = value)
            .or_insert(StoredRow { row, seq });
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Self::count(&rows, object)
    }

    fn count(rows: &HashMap<(Snowflake, Snowflake), StoredRow<D>>, object: Snowflake) -> Tally {
        D::tally(
            rows.values()
                .filter(|stored| stored.row.object == object)
                .map(|stored| stored.row.disposition),
        )
    }
}

#[async_trait]
impl<D: Disposition> DispositionStore<D> for MemoryDispositionStore<D> {
    fn kind(&self) -> EngagementKind {
        self.kind
    }

    async fn find(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Option<D>> {
        self.enter(None).await?;
        Ok(self.get(subject, object))
    }

    async fn insert(&self, subject: Snowflake, object: Snowflake, value: D) -> RepoResult<Tally> {
        self.enter(Some(object)).await?;

        let (racing, always_conflict) = {
            let mut faults = lock(&self.faults);
            (faults.racing_insert.take(), faults.always_conflict)
        };
        if let Some(winner) = racing {
            self.write(subject, object, winner);
        }
        if always_conflict || self.get(subject, object).is_some() {
            return Err(DomainError::ConstraintViolation(format!(
                "{} pair ({subject}, {object}) already exists",
                self.kind
            )));
        }

        Ok(self.write(subject, object, value))
    }

    async fn upsert(&self, subject: Snowflake, object: Snowflake, value: D) -> RepoResult<Tally> {
        self.enter(Some(object)).await?;
        Ok(self.write(subject, object, value))
    }

    async fn delete(&self, subject: Snowflake, object: Snowflake) -> RepoResult<Tally> {
        self.enter(Some(object)).await?;
        let mut rows = lock(&self.rows);
        if rows.remove(&(subject, object)).is_some() {
            self.mutations.fetch_add(1, Ordering::SeqCst);
        }
        Ok(Self::count(&rows, object))
    }

    async fn tally(&self, object: Snowflake) -> RepoResult<Tally> {
        self.enter(None).await?;
        Ok(Self::count(&lock(&self.rows), object))
    }
}
