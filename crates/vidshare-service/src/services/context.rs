//! Service context - dependency container for services
//!
//! Holds the stores, the reconciler and the other dependencies needed by services.

use std::sync::Arc;
use std::time::Duration;

use vidshare_common::auth::JwtService;
use vidshare_core::traits::{
    CommentRepository, DispositionStore, EngagementNotifier, HealthProbe, PlaylistRepository,
    ProfileRepository, SessionRevocations, VideoRepository,
};
use vidshare_core::{Presence, Rating, Reconciler, Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Every store is a trait object so the same services run over PostgreSQL
/// in production and the in-memory stores in tests.
#[derive(Clone)]
pub struct ServiceContext {
    // Entity repositories
    video_repo: Arc<dyn VideoRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    playlist_repo: Arc<dyn PlaylistRepository>,

    // Disposition stores
    video_ratings: Arc<dyn DispositionStore<Rating>>,
    comment_ratings: Arc<dyn DispositionStore<Rating>>,
    subscriptions: Arc<dyn DispositionStore<Presence>>,
    watch_later: Arc<dyn DispositionStore<Presence>>,

    // Events and readiness
    notifier: Arc<dyn EngagementNotifier>,
    probes: Vec<Arc<dyn HealthProbe>>,

    reconciler: Arc<Reconciler>,
    revocations: Arc<dyn SessionRevocations>,
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn video_repo(&self) -> &dyn VideoRepository {
        self.video_repo.as_ref()
    }

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn playlist_repo(&self) -> &dyn PlaylistRepository {
        self.playlist_repo.as_ref()
    }

    // === Disposition stores ===

    pub fn video_ratings(&self) -> &dyn DispositionStore<Rating> {
        self.video_ratings.as_ref()
    }

    pub fn comment_ratings(&self) -> &dyn DispositionStore<Rating> {
        self.comment_ratings.as_ref()
    }

    pub fn subscriptions(&self) -> &dyn DispositionStore<Presence> {
        self.subscriptions.as_ref()
    }

    pub fn watch_later(&self) -> &dyn DispositionStore<Presence> {
        self.watch_later.as_ref()
    }

    // === Events ===

    pub fn notifier(&self) -> &dyn EngagementNotifier {
        self.notifier.as_ref()
    }

    /// Readiness probes of the backing dependencies
    pub fn probes(&self) -> &[Arc<dyn HealthProbe>] {
        &self.probes
    }

    // === Services ===

    pub fn reconciler(&self) -> &Reconciler {
        self.reconciler.as_ref()
    }

    /// Signed-out sessions shared by every instance
    pub fn revocations(&self) -> &dyn SessionRevocations {
        self.revocations.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("disposition_stores", &"...")
            .field("probes", &self.probes.len())
            .field("reconciler", &self.reconciler)
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    video_repo: Option<Arc<dyn VideoRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    playlist_repo: Option<Arc<dyn PlaylistRepository>>,
    video_ratings: Option<Arc<dyn DispositionStore<Rating>>>,
    comment_ratings: Option<Arc<dyn DispositionStore<Rating>>>,
    subscriptions: Option<Arc<dyn DispositionStore<Presence>>>,
    watch_later: Option<Arc<dyn DispositionStore<Presence>>>,
    notifier: Option<Arc<dyn EngagementNotifier>>,
    probes: Vec<Arc<dyn HealthProbe>>,
    reconcile_timeout: Option<Duration>,
    revocations: Option<Arc<dyn SessionRevocations>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            video_repo: None,
            profile_repo: None,
            comment_repo: None,
            playlist_repo: None,
            video_ratings: None,
            comment_ratings: None,
            subscriptions: None,
            watch_later: None,
            notifier: None,
            probes: Vec::new(),
            reconcile_timeout: None,
            revocations: None,
            jwt_service: None,
            snowflake_generator: None,
        }
    }

    pub fn video_repo(mut self, repo: Arc<dyn VideoRepository>) -> Self {
        self.video_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn playlist_repo(mut self, repo: Arc<dyn PlaylistRepository>) -> Self {
        self.playlist_repo = Some(repo);
        self
    }

    pub fn video_ratings(mut self, store: Arc<dyn DispositionStore<Rating>>) -> Self {
        self.video_ratings = Some(store);
        self
    }

    pub fn comment_ratings(mut self, store: Arc<dyn DispositionStore<Rating>>) -> Self {
        self.comment_ratings = Some(store);
        self
    }

    pub fn subscriptions(mut self, store: Arc<dyn DispositionStore<Presence>>) -> Self {
        self.subscriptions = Some(store);
        self
    }

    pub fn watch_later(mut self, store: Arc<dyn DispositionStore<Presence>>) -> Self {
        self.watch_later = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn EngagementNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Bound on every reconciler store call (defaults to 5 s)
    pub fn reconcile_timeout(mut self, timeout: Duration) -> Self {
        self.reconcile_timeout = Some(timeout);
        self
    }

    pub fn revocations(mut self, store: Arc<dyn SessionRevocations>) -> Self {
        self.revocations = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        let reconciler = self
            .reconcile_timeout
            .map_or_else(Reconciler::default, Reconciler::new);

        Ok(ServiceContext {
            video_repo: required(self.video_repo, "video_repo")?,
            profile_repo: required(self.profile_repo, "profile_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            playlist_repo: required(self.playlist_repo, "playlist_repo")?,
            video_ratings: required(self.video_ratings, "video_ratings")?,
            comment_ratings: required(self.comment_ratings, "comment_ratings")?,
            subscriptions: required(self.subscriptions, "subscriptions")?,
            watch_later: required(self.watch_later, "watch_later")?,
            notifier: required(self.notifier, "notifier")?,
            probes: self.probes,
            reconciler: Arc::new(reconciler),
            revocations: required(self.revocations, "revocations")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl ServiceContextBuilder {
    /// Wire every store from the in-memory backend
    pub fn memory(backend: &vidshare_core::testing::MemoryBackend) -> Self {
        Self::new()
            .video_repo(backend.videos.clone())
            .profile_repo(backend.profiles.clone())
            .comment_repo(backend.comments.clone())
            .playlist_repo(backend.playlists.clone())
            .revocations(backend.revocations.clone())
            .video_ratings(backend.video_ratings.clone())
            .comment_ratings(backend.comment_ratings.clone())
            .subscriptions(backend.subscriptions.clone())
            .watch_later(backend.watch_later.clone())
            .notifier(backend.notifier.clone())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
    }
}
