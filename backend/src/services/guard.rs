//! Resolves the calling user from a session token and enforces ownership.

use std::sync::Arc;

use crate::{
    error::AppError,
    models::user::User,
    repositories::UserRepository,
    services::sessions::{SessionError, SessionManager},
    types::{SessionId, UserId},
};

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("invalid or expired session")]
    SessionInvalid,
    #[error("session owner no longer exists")]
    UserNotFound,
    #[error("operation not permitted for this user")]
    Forbidden,
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::NotAuthenticated => AppError::NotAuthenticated,
            GuardError::SessionInvalid | GuardError::UserNotFound => AppError::SessionInvalid,
            GuardError::Forbidden => {
                AppError::Forbidden("You can only access your own resources".into())
            }
            GuardError::Internal(e) => AppError::InternalServerError(e),
        }
    }
}

#[derive(Clone)]
pub struct AuthorizationGuard {
    sessions: SessionManager,
    users: Arc<dyn UserRepository>,
}

impl AuthorizationGuard {
    pub fn new(sessions: SessionManager, users: Arc<dyn UserRepository>) -> Self {
        Self { sessions, users }
    }

    /// Maps an optional session token to the full user record.
    pub async fn resolve(&self, session_id: Option<&str>) -> Result<User, GuardError> {
        let token = session_id
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(GuardError::NotAuthenticated)?;

        let user_id = match self.sessions.validate(&SessionId::from(token)).await {
            Ok(user_id) => user_id,
            Err(SessionError::NotFound | SessionError::Expired) => {
                return Err(GuardError::SessionInvalid)
            }
            Err(e @ (SessionError::Lookup(_) | SessionError::TtlOutOfRange(_))) => {
                return Err(GuardError::Internal(e.into()))
            }
        };

        self.users
            .find_by_id(user_id)
            .await
            .map_err(|e| GuardError::Internal(e.into()))?
            .ok_or(GuardError::UserNotFound)
    }
}

/// Callers may only act on resources they own.
pub fn ensure_owner(caller: UserId, owner: UserId) -> Result<(), GuardError> {
    if caller == owner {
        Ok(())
    } else {
        Err(GuardError::Forbidden)
    }
}
