//! Playlist entity <-> model mapper

use vidshare_core::entities::{Playlist, Visibility};
use vidshare_core::value_objects::Snowflake;

use crate::models::PlaylistModel;

impl From<PlaylistModel> for Playlist {
    fn from(model: PlaylistModel) -> Self {
        Playlist {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            title: model.title,
            description: model.description,
            visibility: model.visibility.parse().unwrap_or(Visibility::Private),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
