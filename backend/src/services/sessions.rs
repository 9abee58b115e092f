//! Session lifecycle: issue, validate and revoke login sessions.

use std::sync::Arc;

use chrono::Duration;

use crate::{
    context::RequestContext,
    error::AppError,
    models::session::{Session, SessionState},
    repositories::{SessionRepository, StoreError},
    types::{SessionId, UserId},
    utils::{Clock, SessionTokenGenerator},
};

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("session expired")]
    Expired,
    #[error("session lookup failed: {0}")]
    Lookup(#[from] StoreError),
    #[error("session ttl {0} cannot be applied to the current time")]
    TtlOutOfRange(Duration),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound | SessionError::Expired => AppError::SessionInvalid,
            SessionError::Lookup(e) => AppError::InternalServerError(e.into()),
            e @ SessionError::TtlOutOfRange(_) => AppError::InternalServerError(e.into()),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<dyn SessionRepository>,
    tokens: Arc<dyn SessionTokenGenerator>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        tokens: Arc<dyn SessionTokenGenerator>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            tokens,
            clock,
            ttl,
        }
    }

    /// Lifetime given to sessions created with [`SessionManager::create`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<Session, SessionError> {
        self.create_with_ttl(ctx, user_id, self.ttl).await
    }

    pub async fn create_with_ttl(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(SessionError::TtlOutOfRange(ttl))?;
        let session = Session {
            session_id: self.tokens.generate(),
            user_id,
            created_at: now,
            expires_at: Some(expires_at),
        };
        self.sessions.insert(&session).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user_id,
            expires_at = ?session.expires_at,
            "Session created"
        );
        Ok(session)
    }

    /// Returns the owning user while the session is active.
    pub async fn validate(&self, session_id: &SessionId) -> Result<UserId, SessionError> {
        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        match session.state_at(self.clock.now()) {
            SessionState::Active => Ok(session.user_id),
            SessionState::Expired => Err(SessionError::Expired),
        }
    }

    /// Ends a session immediately. Unknown and already-expired sessions are a no-op.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        session_id: &SessionId,
    ) -> Result<(), SessionError> {
        let revoked = self.sessions.expire(session_id, self.clock.now()).await?;
        if revoked {
            tracing::info!(request_id = %ctx.request_id, user = %ctx.actor(), "Session revoked");
        } else {
            tracing::debug!(request_id = %ctx.request_id, "Revoke ignored: session not active");
        }
        Ok(())
    }
}
