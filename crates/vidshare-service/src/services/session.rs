//! Session service
//!
//! Turns verified access tokens into explicit [`Session`] values and
//! invalidates them at sign-out. Revocations live in the shared
//! [`SessionRevocations`](vidshare_core::SessionRevocations) store so every
//! API instance refuses a signed-out token.

use tracing::{info, instrument};
use vidshare_core::{require_subject, DomainError, Session};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Verify a bearer token and return its active session
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<Session> {
        let mut session = self.ctx.jwt_service().session_from_token(token)?;
        if self.ctx.revocations().is_revoked(&session.id).await? {
            session.invalidate();
        }
        if !session.is_active() {
            return Err(DomainError::Unauthenticated.into());
        }
        Ok(session)
    }

    /// Sign out: the session's token is refused from now on
    #[instrument(skip(self, session))]
    pub async fn sign_out(&self, session: &Session) -> ServiceResult<()> {
        let user_id = require_subject(Some(session))?;
        self.ctx
            .revocations()
            .revoke(&session.id, session.expires_at)
            .await?;
        info!(user_id = %user_id, session_id = %session.id, "Session signed out");
        Ok(())
    }
}
