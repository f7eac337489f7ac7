//! Video entity <-> model mapper

use vidshare_core::entities::{Video, Visibility};
use vidshare_core::value_objects::Snowflake;

use crate::models::VideoModel;

impl From<VideoModel> for Video {
    fn from(model: VideoModel) -> Self {
        Video {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            title: model.title,
            description: model.description,
            thumbnail_url: model.thumbnail_url,
            video_url: model.video_url,
            duration: model.duration,
            // The column is CHECK-constrained; anything else stays hidden
            visibility: model.visibility.parse().unwrap_or(Visibility::Private),
            views: model.views,
            likes: model.likes,
            dislikes: model.dislikes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Video values for database insertion
pub struct VideoInsert<'a> {
    pub id: i64,
    pub user_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub thumbnail_url: &'a str,
    pub video_url: &'a str,
    pub duration: &'a str,
    pub visibility: &'static str,
}

impl<'a> VideoInsert<'a> {
    pub fn new(video: &'a Video) -> Self {
        Self {
            id: video.id.into_inner(),
            user_id: video.user_id.into_inner(),
            title: &video.title,
            description: &video.description,
            thumbnail_url: &video.thumbnail_url,
            video_url: &video.video_url,
            duration: &video.duration,
            visibility: video.visibility.as_str(),
        }
    }
}
