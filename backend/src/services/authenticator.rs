//! Login and logout built on the credential store and session manager.

use anyhow::anyhow;

use crate::{
    context::RequestContext,
    error::AppError,
    models::{session::Session, user::User},
    services::{
        credentials::{CredentialError, CredentialStore},
        sessions::{SessionError, SessionManager},
    },
    types::SessionId,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidCredentials => AuthError::InvalidCredentials,
            CredentialError::Internal(e) => AuthError::Internal(e),
            other => AuthError::Internal(anyhow!(other)),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::Internal(anyhow!(err))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated => AppError::NotAuthenticated,
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Internal(e) => AppError::InternalServerError(e),
        }
    }
}

/// A verified user together with the session just issued for them.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub session: Session,
}

#[derive(Clone)]
pub struct Authenticator {
    credentials: CredentialStore,
    sessions: SessionManager,
}

impl Authenticator {
    pub fn new(credentials: CredentialStore, sessions: SessionManager) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let user = self.credentials.verify(ctx, username, password).await?;
        let session = self.sessions.create(ctx, user.id).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user.id,
            username = %user.username,
            "User logged in"
        );
        Ok(LoginOutcome { user, session })
    }

    /// Revokes the presented session. A token whose session is already gone
    /// still counts as a successful logout.
    pub async fn logout(
        &self,
        ctx: &RequestContext,
        session_id: Option<&str>,
    ) -> Result<(), AuthError> {
        let token = session_id
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::NotAuthenticated)?;

        self.sessions.revoke(ctx, &SessionId::from(token)).await?;
        tracing::info!(request_id = %ctx.request_id, user = %ctx.actor(), "User logged out");
        Ok(())
    }
}
