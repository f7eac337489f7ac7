//! Video handlers
//!
//! Feed, watch page, views, ratings, watch-later toggles and owner edits.

use axum::{extract::State, Json};
use vidshare_service::dto::{
    CreateVideoRequest, EngagementResponse, PaginatedResponse, RateRequest, ToggleRequest,
    UpdateVideoRequest, VideoEngagementResponse, VideoPageResponse, VideoResponse,
    ViewCountResponse,
};
use vidshare_service::{EngagementService, VideoService};

use crate::extractors::{
    AuthSession, IdPath, OptionalAuthSession, OptionalValidatedJson, Pagination, Search,
    ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Public videos, newest first; `?q=` searches
///
/// GET /videos
pub async fn list_videos(
    State(state): State<AppState>,
    Search(search): Search,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<VideoResponse>>> {
    let page = VideoService::new(state.service_context())
        .feed(search, pagination.into())
        .await?;
    Ok(Json(page))
}

/// Register an uploaded video
///
/// POST /videos
pub async fn create_video(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> ApiResult<Created<VideoResponse>> {
    let video = VideoService::new(state.service_context())
        .create_video(Some(&session), request)
        .await?;
    Ok(Created(video))
}

/// Video with channel and engagement
///
/// GET /videos/{video_id}
pub async fn get_video(
    State(state): State<AppState>,
    auth: OptionalAuthSession,
    IdPath(video_id): IdPath,
) -> ApiResult<Json<VideoPageResponse>> {
    let page = VideoService::new(state.service_context())
        .get_video(auth.session(), video_id)
        .await?;
    Ok(Json(page))
}

/// PATCH /videos/{video_id}
pub async fn update_video(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(video_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateVideoRequest>,
) -> ApiResult<Json<VideoResponse>> {
    let video = VideoService::new(state.service_context())
        .update_video(Some(&session), video_id, request)
        .await?;
    Ok(Json(video))
}

/// DELETE /videos/{video_id}
pub async fn delete_video(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(video_id): IdPath,
) -> ApiResult<NoContent> {
    VideoService::new(state.service_context())
        .delete_video(Some(&session), video_id)
        .await?;
    Ok(NoContent)
}

/// Live counters and the caller's own engagement
///
/// GET /videos/{video_id}/engagement
pub async fn get_engagement(
    State(state): State<AppState>,
    auth: OptionalAuthSession,
    IdPath(video_id): IdPath,
) -> ApiResult<Json<VideoEngagementResponse>> {
    let engagement = EngagementService::new(state.service_context())
        .video_engagement(auth.session(), video_id)
        .await?;
    Ok(Json(engagement))
}

/// Count a view
///
/// POST /videos/{video_id}/views
pub async fn record_view(
    State(state): State<AppState>,
    auth: OptionalAuthSession,
    IdPath(video_id): IdPath,
) -> ApiResult<Json<ViewCountResponse>> {
    let views = VideoService::new(state.service_context())
        .record_view(auth.session(), video_id)
        .await?;
    Ok(Json(views))
}

/// Like or dislike
///
/// PUT /videos/{video_id}/rating
pub async fn rate_video(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(video_id): IdPath,
    ValidatedJson(request): ValidatedJson<RateRequest>,
) -> ApiResult<Json<EngagementResponse>> {
    let response = EngagementService::new(state.service_context())
        .rate_video(Some(&session), video_id, request.rating, request.current)
        .await?;
    Ok(Json(response))
}

/// Toggle the watch-later entry
///
/// PUT /videos/{video_id}/watch-later
pub async fn toggle_watch_later(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(video_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<ToggleRequest>,
) -> ApiResult<Json<EngagementResponse>> {
    let current = request.unwrap_or_default().current;
    let response = EngagementService::new(state.service_context())
        .toggle_watch_later(Some(&session), video_id, current)
        .await?;
    Ok(Json(response))
}
