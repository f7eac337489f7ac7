//! Explicit caller session
//!
//! A [`Session`] is built from verified access-token claims when a request
//! arrives and handed to every operation that acts on behalf of a user.
//! Nothing in the domain layer reads identity from anywhere else.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// Signed out; never becomes active again
    Invalidated,
}

/// Authenticated caller identity with a bounded lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: Snowflake,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub state: SessionState,
}

impl Session {
    /// Start an active session (sign-in)
    pub fn new(
        id: impl Into<String>,
        user_id: Snowflake,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id,
            issued_at,
            expires_at,
            state: SessionState::Active,
        }
    }

    /// Whether the session can act at the given instant
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.state == SessionState::Active && now < self.expires_at
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// The acting subject, if the session is still valid
    pub fn subject(&self) -> Result<Snowflake, DomainError> {
        if self.is_active() {
            Ok(self.user_id)
        } else {
            Err(DomainError::Unauthenticated)
        }
    }

    /// Sign out
    pub fn invalidate(&mut self) {
        self.state = SessionState::Invalidated;
    }
}

/// Resolve the subject of an optional session
pub fn require_subject(session: Option<&Session>) -> Result<Snowflake, DomainError> {
    session.ok_or(DomainError::Unauthenticated)?.subject()
}
