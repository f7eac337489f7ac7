//! Domain entities

mod comment;
mod engagement;
mod playlist;
mod profile;
mod video;

pub use comment::{thread_comments, Comment, CommentThread, MAX_COMMENT_LENGTH};
pub use engagement::{EngagementRow, Tally};
pub use playlist::{Playlist, MAX_PLAYLIST_TITLE_LENGTH};
pub use profile::UserProfile;
pub use video::{Video, Visibility};
