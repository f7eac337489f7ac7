//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and takes the caller's
//! [`Session`](vidshare_core::Session) explicitly.

pub mod channel;
pub mod comment;
pub mod context;
pub mod engagement;
pub mod error;
pub mod health;
pub mod library;
pub mod playlist;
pub mod session;
pub mod video;

pub use channel::ChannelService;
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use engagement::EngagementService;
pub use error::{ServiceError, ServiceResult};
pub use health::HealthService;
pub use library::LibraryService;
pub use playlist::PlaylistService;
pub use session::SessionService;
pub use video::VideoService;
