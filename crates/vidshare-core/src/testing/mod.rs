//! In-memory stores for tests (enabled with the `testing` feature)
//!
//! The stores mirror the SQL behaviour that matters to callers: one row per
//! pair, counters counted from live rows, foreign-key style reference checks,
//! and cascade on delete. Faults can be injected per store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

mod disposition_store;
mod repositories;
mod revocations;

pub use disposition_store::MemoryDispositionStore;
pub use repositories::{
    MemoryCommentRepository, MemoryPlaylistRepository, MemoryProfileRepository,
    MemoryVideoRepository, RecordingNotifier, StaticProbe,
};
pub use revocations::MemorySessionRevocations;

use crate::value_objects::{EngagementKind, Presence, Rating};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Every in-memory store, wired together the way the SQL schema is
pub struct MemoryBackend {
    pub video_ratings: Arc<MemoryDispositionStore<Rating>>,
    pub comment_ratings: Arc<MemoryDispositionStore<Rating>>,
    pub subscriptions: Arc<MemoryDispositionStore<Presence>>,
    pub watch_later: Arc<MemoryDispositionStore<Presence>>,
    pub videos: Arc<MemoryVideoRepository>,
    pub profiles: Arc<MemoryProfileRepository>,
    pub comments: Arc<MemoryCommentRepository>,
    pub playlists: Arc<MemoryPlaylistRepository>,
    pub revocations: Arc<MemorySessionRevocations>,
    pub notifier: Arc<RecordingNotifier>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let video_ratings = Arc::new(MemoryDispositionStore::with_known_objects(
            EngagementKind::VideoRating,
        ));
        let comment_ratings = Arc::new(MemoryDispositionStore::with_known_objects(
            EngagementKind::CommentRating,
        ));
        let subscriptions = Arc::new(MemoryDispositionStore::with_known_objects(
            EngagementKind::Subscription,
        ));
        let watch_later = Arc::new(MemoryDispositionStore::with_known_objects(
            EngagementKind::WatchLater,
        ));

        let profiles = Arc::new(MemoryProfileRepository::new(Arc::clone(&subscriptions)));
        let comments = Arc::new(MemoryCommentRepository::new(Arc::clone(&comment_ratings)));

        Self {
            videos: Arc::new(MemoryVideoRepository::new(
                Arc::clone(&video_ratings),
                Arc::clone(&watch_later),
                Arc::clone(&profiles),
                Arc::clone(&comments),
            )),
            profiles,
            comments,
            playlists: Arc::new(MemoryPlaylistRepository::new()),
            revocations: Arc::new(MemorySessionRevocations::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            video_ratings,
            comment_ratings,
            subscriptions,
            watch_later,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
