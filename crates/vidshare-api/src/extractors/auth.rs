//! Session extractor
//!
//! Resolves the bearer token of the Authorization header into an explicit
//! [`Session`].

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use vidshare_core::Session;
use vidshare_service::SessionService;

use crate::response::ApiError;
use crate::state::AppState;

async fn resolve(state: &AppState, token: &str) -> Result<Session, ApiError> {
    SessionService::new(state.service_context())
        .authenticate(token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Rejected access token");
            ApiError::from(e)
        })
}

/// Active session of the caller
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        resolve(&app_state, bearer.token()).await.map(AuthSession)
    }
}

/// Session of the caller, if any
///
/// A missing header yields `None`; a present but invalid token is rejected.
#[derive(Debug, Clone)]
pub struct OptionalAuthSession(pub Option<Session>);

impl OptionalAuthSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let app_state = AppState::from_ref(state);
                resolve(&app_state, bearer.token())
                    .await
                    .map(|s| OptionalAuthSession(Some(s)))
            }
            Err(_) => Ok(OptionalAuthSession(None)),
        }
    }
}
