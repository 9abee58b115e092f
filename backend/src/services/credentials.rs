//! Credential store: registration, password verification and account updates.

use std::sync::{Arc, OnceLock};

use crate::{
    context::RequestContext,
    error::AppError,
    models::user::{NewUser, UpdateUser, User, UserChanges},
    repositories::{StoreError, UserRepository},
    types::UserId,
    utils::{Clock, PasswordHashProvider},
};

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("user still owns ledger entries")]
    UserHasTransactions,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        CredentialError::Internal(err.into())
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::DuplicateUsername => AppError::DuplicateUsername,
            CredentialError::InvalidCredentials => AppError::InvalidCredentials,
            CredentialError::UserNotFound => AppError::NotFound("User not found".into()),
            CredentialError::UserHasTransactions => AppError::Conflict(
                "User has recorded transactions and cannot be deleted".into(),
            ),
            CredentialError::Internal(e) => AppError::InternalServerError(e),
        }
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHashProvider>,
    clock: Arc<dyn Clock>,
    decoy_hash: Arc<OnceLock<String>>,
}

impl CredentialStore {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHashProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    pub async fn register(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<User, CredentialError> {
        let password_hash = self.hasher.hash(password)?;
        let new_user = NewUser {
            username: username.to_string(),
            password_hash,
            is_active: true,
            created_at: self.clock.now(),
        };

        match self.users.create(new_user).await {
            Ok(user) => {
                tracing::info!(
                    request_id = %ctx.request_id,
                    user_id = %user.id,
                    username = %user.username,
                    "User registered"
                );
                Ok(user)
            }
            Err(StoreError::UniqueViolation(_)) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    username = %username,
                    "Registration rejected: username already exists"
                );
                Err(CredentialError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks a username/password pair. Unknown users, wrong passwords and
    /// inactive accounts all fail with the same `InvalidCredentials`.
    pub async fn verify(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<User, CredentialError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            // Burn a comparable amount of work so response timing does not
            // reveal whether the username exists.
            let _ = self.hasher.verify(password, self.decoy_hash());
            tracing::warn!(request_id = %ctx.request_id, "Login rejected");
            return Err(CredentialError::InvalidCredentials);
        };

        let matches = self.hasher.verify(password, &user.password_hash)?;
        if !matches || !user.is_active {
            tracing::warn!(request_id = %ctx.request_id, user_id = %user.id, "Login rejected");
            return Err(CredentialError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<User, CredentialError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(CredentialError::UserNotFound)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: UserId,
        payload: UpdateUser,
    ) -> Result<User, CredentialError> {
        let password_hash = match payload.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let changes = UserChanges {
            password_hash,
            is_active: payload.is_active,
        };
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let user = self
            .users
            .update(id, changes)
            .await?
            .ok_or(CredentialError::UserNotFound)?;
        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user.id,
            password_changed = payload.password.is_some(),
            is_active = user.is_active,
            "User updated"
        );
        Ok(user)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), CredentialError> {
        match self.users.delete(id).await {
            Ok(true) => {
                tracing::info!(request_id = %ctx.request_id, user_id = %id, "User deleted");
                Ok(())
            }
            Ok(false) => Err(CredentialError::UserNotFound),
            Err(StoreError::ForeignKeyViolation(_)) => Err(CredentialError::UserHasTransactions),
            Err(e) => Err(e.into()),
        }
    }

    fn decoy_hash(&self) -> &str {
        self.decoy_hash
            .get_or_init(|| self.hasher.hash(DECOY_PASSWORD).unwrap_or_default())
    }
}
