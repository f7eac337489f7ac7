//! Session handlers

use axum::extract::State;
use vidshare_service::SessionService;

use crate::extractors::AuthSession;
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Sign out; the presented token is refused afterwards
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<NoContent> {
    SessionService::new(state.service_context()).sign_out(&session)
        .await?;
    Ok(NoContent)
}
