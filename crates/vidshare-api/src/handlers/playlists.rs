//! Playlist handlers

use axum::extract::State;
use vidshare_service::dto::{CreatePlaylistRequest, PlaylistResponse};
use vidshare_service::PlaylistService;

use crate::extractors::{AuthSession, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    ValidatedJson(request): ValidatedJson<CreatePlaylistRequest>,
) -> ApiResult<Created<PlaylistResponse>> {
    let playlist = PlaylistService::new(state.service_context())
        .create_playlist(Some(&session), request)
        .await?;
    Ok(Created(playlist))
}

/// DELETE /playlists/{playlist_id}
pub async fn delete_playlist(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    IdPath(playlist_id): IdPath,
) -> ApiResult<NoContent> {
    PlaylistService::new(state.service_context())
        .delete_playlist(Some(&session), playlist_id)
        .await?;
    Ok(NoContent)
}
