//! Channel handlers

use axum::{extract::State, Json};
use vidshare_service::dto::{ChannelPageResponse, EngagementResponse, ToggleRequest};
use vidshare_service::{ChannelService, EngagementService};

use crate::extractors::{
    AuthSession, IdPath, OptionalAuthSession, OptionalValidatedJson, Pagination,
};
use crate::response::ApiResult;
use crate::state::AppState;

/// Channel page with public uploads
///
/// GET /channels/{channel_id}
pub async fn get_channel(
    State(state): State<AppState>,
    auth: OptionalAuthSession,
    IdPath(channel_id): IdPath,
    pagination: Pagination,
) -> ApiResult<Json<ChannelPageResponse>> {
    let page = ChannelService::new(state.service_context())
        .get_channel(auth.session(), channel_id, pagination.into())
        .await?;
    Ok(Json(page))
}

/// Subscribe / unsubscribe
///
/// PUT /channels/{channel_id}/subscription
pub async fn toggle_subscription(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(channel_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<ToggleRequest>,
) -> ApiResult<Json<EngagementResponse>> {
    let current = request.unwrap_or_default().current;
    let response = EngagementService::new(state.service_context())
        .toggle_subscription(Some(&session), channel_id, current)
        .await?;
    Ok(Json(response))
}
