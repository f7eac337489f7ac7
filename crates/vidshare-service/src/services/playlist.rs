//! Playlist service

use tracing::{info, instrument};
use validator::Validate;
use vidshare_core::{require_subject, DomainError, PageQuery, Playlist, Session, Snowflake};

use crate::dto::{CreatePlaylistRequest, PaginatedResponse, PlaylistResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::library::overfetch;

pub struct PlaylistService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PlaylistService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, session, request))]
    pub async fn create_playlist(
        &self,
        session: Option<&Session>,
        request: CreatePlaylistRequest,
    ) -> ServiceResult<PlaylistResponse> {
        let user_id = require_subject(session)?;
        request.validate()?;

        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        let mut playlist = Playlist::new(self.ctx.generate_id(), user_id, title);
        playlist.description = request.description;
        playlist.visibility = request.visibility;

        self.ctx.playlist_repo().create(&playlist).await?;

        info!(playlist_id = %playlist.id, user_id = %user_id, "Playlist created");

        Ok(playlist.into())
    }

    /// The caller's playlists, newest first
    #[instrument(skip(self, session))]
    pub async fn my_playlists(
        &self,
        session: Option<&Session>,
        page: PageQuery,
    ) -> ServiceResult<PaginatedResponse<PlaylistResponse>> {
        let user_id = require_subject(session)?;
        let playlists = self
            .ctx
            .playlist_repo()
            .find_by_user(user_id, overfetch(page))
            .await?;

        let playlists = playlists.into_iter().map(PlaylistResponse::from).collect();
        Ok(PaginatedResponse::from_overfetch(
            playlists,
            page.limit,
            page.offset,
        ))
    }

    #[instrument(skip(self, session))]
    pub async fn delete_playlist(
        &self,
        session: Option<&Session>,
        playlist_id: Snowflake,
    ) -> ServiceResult<()> {
        let user_id = require_subject(session)?;

        let playlist = self
            .ctx
            .playlist_repo()
            .find_by_id(playlist_id)
            .await?
            .filter(|p| p.is_visible_to(Some(user_id)))
            .ok_or(DomainError::PlaylistNotFound(playlist_id))?;
        if !playlist.is_owned_by(user_id) {
            return Err(DomainError::NotPlaylistOwner.into());
        }

        self.ctx.playlist_repo().delete(playlist_id).await?;

        info!(playlist_id = %playlist_id, user_id = %user_id, "Playlist deleted");

        Ok(())
    }
}
