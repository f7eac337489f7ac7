//! In-memory entity repositories wired to the memory disposition stores

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{lock, MemoryDispositionStore};
use crate::entities::{Comment, Playlist, Tally, UserProfile, Video, Visibility};
use crate::error::DomainError;
use crate::events::EngagementEvent;
use crate::traits::{
    CommentRepository, EngagementNotifier, HealthProbe, PageQuery, PlaylistRepository,
    ProfileRepository, RepoResult, VideoRepository,
};
use crate::value_objects::{Presence, Rating, Snowflake};

fn page<T>(items: Vec<T>, page: PageQuery) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

fn newest_first(videos: &mut [Video]) {
    videos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

// ============================================================================
// Videos
// ============================================================================

/// Videos whose counters are read from the rating store.
///
/// Deleting a video cascades to its ratings, watch-later rows and comments,
/// and every upload or delete recounts the channel's videos.
pub struct MemoryVideoRepository {
    videos: Mutex<HashMap<Snowflake, Video>>,
    ratings: Arc<MemoryDispositionStore<Rating>>,
    watch_later: Arc<MemoryDispositionStore<Presence>>,
    profiles: Arc<MemoryProfileRepository>,
    comments: Arc<MemoryCommentRepository>,
}

impl MemoryVideoRepository {
    pub fn new(
        ratings: Arc<MemoryDispositionStore<Rating>>,
        watch_later: Arc<MemoryDispositionStore<Presence>>,
        profiles: Arc<MemoryProfileRepository>,
        comments: Arc<MemoryCommentRepository>,
    ) -> Self {
        Self {
            videos: Mutex::new(HashMap::new()),
            ratings,
            watch_later,
            profiles,
            comments,
        }
    }

    fn recount_channel(&self, user_id: Snowflake) {
        let count = lock(&self.videos)
            .values()
            .filter(|v| v.user_id == user_id)
            .count();
        self.profiles.set_video_count(user_id, count as i64);
    }

    fn sorted_page(&self, mut videos: Vec<Video>, page_query: PageQuery) -> Vec<Video> {
        newest_first(&mut videos);
        page(videos, page_query)
            .into_iter()
            .map(|v| self.hydrate(v))
            .collect()
    }

    fn hydrate(&self, mut video: Video) -> Video {
        if let Tally::Rating { likes, dislikes } = self.ratings.tally_now(video.id) {
            video.likes = likes;
            video.dislikes = dislikes;
        }
        video
    }

    fn collect(&self, ids: impl Iterator<Item = Snowflake>, page_query: PageQuery) -> Vec<Video> {
        let found: Vec<Video> = {
            let videos = lock(&self.videos);
            ids.filter_map(|id| videos.get(&id).cloned()).collect()
        };
        page(found, page_query)
            .into_iter()
            .map(|v| self.hydrate(v))
            .collect()
    }
}

#[async_trait]
impl VideoRepository for MemoryVideoRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>> {
        let video = lock(&self.videos).get(&id).cloned();
        Ok(video.map(|v| self.hydrate(v)))
    }

    async fn create(&self, video: &Video) -> RepoResult<()> {
        lock(&self.videos).insert(video.id, video.clone());
        self.ratings.register_object(video.id);
        self.watch_later.register_object(video.id);
        self.recount_channel(video.user_id);
        Ok(())
    }

    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64> {
        let mut videos = lock(&self.videos);
        let video = videos.get_mut(&id).ok_or(DomainError::VideoNotFound(id))?;
        video.views += 1;
        Ok(video.views)
    }

    async fn find_liked_by_user(
        &self,
        user_id: Snowflake,
        page_query: PageQuery,
    ) -> RepoResult<Vec<Video>> {
        let liked = self
            .ratings
            .rows_by_subject(user_id)
            .into_iter()
            .filter(|row| row.disposition.is_like())
            .map(|row| row.object);
        Ok(self.collect(liked, page_query))
    }

    async fn find_watch_later_by_user(
        &self,
        user_id: Snowflake,
        page_query: PageQuery,
    ) -> RepoResult<Vec<Video>> {
        let saved = self
            .watch_later
            .rows_by_subject(user_id)
            .into_iter()
            .map(|row| row.object);
        Ok(self.collect(saved, page_query))
    }

    async fn find_public(
        &self,
        query: Option<&str>,
        page_query: PageQuery,
    ) -> RepoResult<Vec<Video>> {
        let public: Vec<Video> = lock(&self.videos)
            .values()
            .filter(|v| v.visibility == Visibility::Public)
            .cloned()
            .collect();

        let matching = match query.map(str::to_lowercase) {
            None => public,
            Some(needle) => public
                .into_iter()
                .filter(|v| {
                    contains_ignore_case(&v.title, &needle)
                        || contains_ignore_case(&v.description, &needle)
                        || self
                            .profiles
                            .display_name(v.user_id)
                            .is_some_and(|name| contains_ignore_case(&name, &needle))
                })
                .collect(),
        };
        Ok(self.sorted_page(matching, page_query))
    }

    async fn find_by_channel(
        &self,
        user_id: Snowflake,
        public_only: bool,
        page_query: PageQuery,
    ) -> RepoResult<Vec<Video>> {
        let uploads: Vec<Video> = lock(&self.videos)
            .values()
            .filter(|v| v.user_id == user_id)
            .filter(|v| !public_only || v.visibility == Visibility::Public)
            .cloned()
            .collect();
        Ok(self.sorted_page(uploads, page_query))
    }

    async fn update(&self, video: &Video) -> RepoResult<()> {
        let mut videos = lock(&self.videos);
        let stored = videos
            .get_mut(&video.id)
            .ok_or(DomainError::VideoNotFound(video.id))?;
        stored.title.clone_from(&video.title);
        stored.description.clone_from(&video.description);
        stored.thumbnail_url.clone_from(&video.thumbnail_url);
        stored.visibility = video.visibility;
        stored.updated_at = video.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let removed = lock(&self.videos)
            .remove(&id)
            .ok_or(DomainError::VideoNotFound(id))?;
        self.ratings.purge_object(id);
        self.watch_later.purge_object(id);
        self.comments.purge_video(id);
        self.recount_channel(removed.user_id);
        Ok(())
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Profiles whose subscriber count is read from the subscription store
pub struct MemoryProfileRepository {
    profiles: Mutex<HashMap<Snowflake, UserProfile>>,
    subscriptions: Arc<MemoryDispositionStore<Presence>>,
}

impl MemoryProfileRepository {
    pub fn new(subscriptions: Arc<MemoryDispositionStore<Presence>>) -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            subscriptions,
        }
    }

    fn hydrate(&self, mut profile: UserProfile) -> UserProfile {
        profile.subscriber_count = self.subscriptions.tally_now(profile.id).total();
        profile
    }

    fn display_name(&self, id: Snowflake) -> Option<String> {
        lock(&self.profiles).get(&id).map(|p| p.display_name.clone())
    }

    fn set_video_count(&self, id: Snowflake, count: i64) {
        if let Some(profile) = lock(&self.profiles).get_mut(&id) {
            profile.video_count = count;
        }
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserProfile>> {
        let profile = lock(&self.profiles).get(&id).cloned();
        Ok(profile.map(|p| self.hydrate(p)))
    }

    async fn create(&self, profile: &UserProfile) -> RepoResult<()> {
        lock(&self.profiles).insert(profile.id, profile.clone());
        self.subscriptions.register_object(profile.id);
        Ok(())
    }

    async fn find_subscriptions(
        &self,
        subscriber_id: Snowflake,
        page_query: PageQuery,
    ) -> RepoResult<Vec<UserProfile>> {
        let channels: Vec<UserProfile> = {
            let profiles = lock(&self.profiles);
            self.subscriptions
                .rows_by_subject(subscriber_id)
                .into_iter()
                .filter_map(|row| profiles.get(&row.object).cloned())
                .collect()
        };
        Ok(page(channels, page_query)
            .into_iter()
            .map(|p| self.hydrate(p))
            .collect())
    }

    async fn update(&self, profile: &UserProfile) -> RepoResult<()> {
        let mut profiles = lock(&self.profiles);
        let stored = profiles
            .get_mut(&profile.id)
            .ok_or(DomainError::ChannelNotFound(profile.id))?;
        stored.display_name.clone_from(&profile.display_name);
        stored.bio.clone_from(&profile.bio);
        stored.photo_url.clone_from(&profile.photo_url);
        stored.updated_at = profile.updated_at;
        Ok(())
    }
}

// ============================================================================
// Comments
// ============================================================================

/// Comments whose counters are read from the comment rating store
pub struct MemoryCommentRepository {
    comments: Mutex<HashMap<Snowflake, Comment>>,
    ratings: Arc<MemoryDispositionStore<Rating>>,
}

impl MemoryCommentRepository {
    pub fn new(ratings: Arc<MemoryDispositionStore<Rating>>) -> Self {
        Self {
            comments: Mutex::new(HashMap::new()),
            ratings,
        }
    }

    fn hydrate(&self, mut comment: Comment) -> Comment {
        if let Tally::Rating { likes, dislikes } = self.ratings.tally_now(comment.id) {
            comment.likes = likes;
            comment.dislikes = dislikes;
        }
        comment
    }

    /// Drop every comment of a deleted video
    fn purge_video(&self, video_id: Snowflake) {
        let removed: Vec<Snowflake> = {
            let mut comments = lock(&self.comments);
            let ids: Vec<Snowflake> = comments
                .values()
                .filter(|c| c.video_id == video_id)
                .map(|c| c.id)
                .collect();
            for id in &ids {
                comments.remove(id);
            }
            ids
        };
        for id in removed {
            self.ratings.purge_object(id);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.comments).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let comment = lock(&self.comments).get(&id).cloned();
        Ok(comment.map(|c| self.hydrate(c)))
    }

    async fn find_by_video(&self, video_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let comments: Vec<Comment> = lock(&self.comments)
            .values()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        Ok(comments.into_iter().map(|c| self.hydrate(c)).collect())
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        lock(&self.comments).insert(comment.id, comment.clone());
        self.ratings.register_object(comment.id);
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let mut comments = lock(&self.comments);
        let stored = comments
            .get_mut(&comment.id)
            .ok_or(DomainError::CommentNotFound(comment.id))?;
        stored.content.clone_from(&comment.content);
        stored.updated_at = comment.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let removed: Vec<Snowflake> = {
            let mut comments = lock(&self.comments);
            if comments.remove(&id).is_none() {
                return Err(DomainError::CommentNotFound(id));
            }
            let replies: Vec<Snowflake> = comments
                .values()
                .filter(|c| c.parent_id == Some(id))
                .map(|c| c.id)
                .collect();
            for reply in &replies {
                comments.remove(reply);
            }
            replies
        };
        self.ratings.purge_object(id);
        for reply in removed {
            self.ratings.purge_object(reply);
        }
        Ok(())
    }
}

// ============================================================================
// Playlists
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryPlaylistRepository {
    playlists: Mutex<HashMap<Snowflake, Playlist>>,
}

impl MemoryPlaylistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaylistRepository for MemoryPlaylistRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Playlist>> {
        Ok(lock(&self.playlists).get(&id).cloned())
    }

    async fn create(&self, playlist: &Playlist) -> RepoResult<()> {
        lock(&self.playlists).insert(playlist.id, playlist.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page_query: PageQuery,
    ) -> RepoResult<Vec<Playlist>> {
        let mut mine: Vec<Playlist> = lock(&self.playlists)
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(mine, page_query))
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        lock(&self.playlists)
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::PlaylistNotFound(id))
    }
}

// ============================================================================
// Notifier and probes
// ============================================================================

/// Keeps every published event; can be switched to fail
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<EngagementEvent>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<EngagementEvent> {
        lock(&self.events).clone()
    }
}

#[async_trait]
impl EngagementNotifier for RecordingNotifier {
    async fn notify(&self, event: &EngagementEvent) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("notifier offline".into()));
        }
        lock(&self.events).push(event.clone());
        Ok(())
    }
}

/// Probe with a fixed answer
#[derive(Debug)]
pub struct StaticProbe {
    name: &'static str,
    healthy: AtomicBool,
}

impl StaticProbe {
    pub fn new(name: &'static str, healthy: bool) -> Self {
        Self {
            name,
            healthy: AtomicBool::new(healthy),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}
