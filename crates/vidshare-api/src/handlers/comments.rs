//! Comment handlers

use axum::{extract::State, Json};
use vidshare_service::dto::{
    CommentResponse, CommentThreadResponse, CreateCommentRequest, EngagementResponse,
    RateRequest, UpdateCommentRequest,
};
use vidshare_service::{CommentService, EngagementService};

use crate::extractors::{AuthSession, IdPath, OptionalAuthSession, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Threaded comments of a video
///
/// GET /videos/{video_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    auth: OptionalAuthSession,
    IdPath(video_id): IdPath,
) -> ApiResult<Json<Vec<CommentThreadResponse>>> {
    let threads = CommentService::new(state.service_context())
        .list_comments(auth.session(), video_id)
        .await?;
    Ok(Json(threads))
}

/// Comment or reply (`parent_id`)
///
/// POST /videos/{video_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(video_id): IdPath,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<CommentResponse>> {
    let comment = CommentService::new(state.service_context())
        .create_comment(Some(&session), video_id, request)
        .await?;
    Ok(Created(comment))
}

/// PATCH /comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(comment_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let comment = CommentService::new(state.service_context())
        .update_comment(Some(&session), comment_id, request)
        .await?;
    Ok(Json(comment))
}

/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(comment_id): IdPath,
) -> ApiResult<NoContent> {
    CommentService::new(state.service_context())
        .delete_comment(Some(&session), comment_id)
        .await?;
    Ok(NoContent)
}

/// PUT /comments/{comment_id}/rating
pub async fn rate_comment(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(comment_id): IdPath,
    ValidatedJson(request): ValidatedJson<RateRequest>,
) -> ApiResult<Json<EngagementResponse>> {
    let response = EngagementService::new(state.service_context())
        .rate_comment(Some(&session), comment_id, request.rating, request.current)
        .await?;
    Ok(Json(response))
}
