//! Handlers for the current user: library, uploads and profile

use axum::{extract::State, Json};
use vidshare_service::dto::{
    ChannelResponse, PaginatedResponse, PlaylistResponse, UpdateProfileRequest, VideoResponse,
};
use vidshare_service::{ChannelService, LibraryService, PlaylistService, VideoService};

use crate::extractors::{AuthSession, Pagination, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/@me/liked
pub async fn liked_videos(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<VideoResponse>>> {
    let page = LibraryService::new(state.service_context())
        .liked_videos(Some(&session), pagination.into())
        .await?;
    Ok(Json(page))
}

/// GET /users/@me/watch-later
pub async fn watch_later_videos(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<VideoResponse>>> {
    let page = LibraryService::new(state.service_context())
        .watch_later_videos(Some(&session), pagination.into())
        .await?;
    Ok(Json(page))
}

/// GET /users/@me/subscriptions
pub async fn subscriptions(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<ChannelResponse>>> {
    let page = LibraryService::new(state.service_context())
        .subscriptions(Some(&session), pagination.into())
        .await?;
    Ok(Json(page))
}

/// PATCH /users/@me
pub async fn update_profile(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ChannelResponse>> {
    let channel = ChannelService::new(state.service_context())
        .update_profile(Some(&session), request)
        .await?;
    Ok(Json(channel))
}

/// Own uploads, private ones included
///
/// GET /users/@me/videos
pub async fn my_videos(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<VideoResponse>>> {
    let page = VideoService::new(state.service_context())
        .my_videos(Some(&session), pagination.into())
        .await?;
    Ok(Json(page))
}

/// GET /users/@me/playlists
pub async fn my_playlists(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<PlaylistResponse>>> {
    let page = PlaylistService::new(state.service_context())
        .my_playlists(Some(&session), pagination.into())
        .await?;
    Ok(Json(page))
}
