//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod engagement;
mod playlist;
mod user;
mod video;

pub use comment::CommentModel;
pub use engagement::{PresenceTallyModel, RatingTallyModel};
pub use playlist::PlaylistModel;
pub use user::UserModel;
pub use video::VideoModel;
