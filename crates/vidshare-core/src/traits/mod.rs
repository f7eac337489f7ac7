//! Store traits

mod repositories;

pub use repositories::{
    CommentRepository, DispositionStore, EngagementNotifier, HealthProbe, PageQuery,
    PlaylistRepository, ProfileRepository, RepoResult, SessionRevocations, VideoRepository,
};
