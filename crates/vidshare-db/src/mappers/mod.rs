//! Entity to model mappers
//!
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod comment;
mod engagement;
mod playlist;
mod user;
mod video;

pub use comment::CommentInsert;
pub use user::UserInsert;
pub use video::VideoInsert;
