//! User repository trait and its PostgreSQL implementation.
//!
//! The trait can be mocked with mockall for testing purposes.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    models::user::{NewUser, User, UserChanges},
    repositories::common::StoreError,
    types::UserId,
};

const TABLE_NAME: &str = "users";
const SELECT_COLUMNS: &str = "id, username, password_hash, is_active, created_at";

/// Repository trait for User operations.
///
/// This trait is designed to be mockable using mockall for testing.
/// Use `MockUserRepository` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a taken username yields `StoreError::UniqueViolation`.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Find a user by exact (case-sensitive) username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Apply changes; `None` when the user does not exist.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, StoreError>;

    /// Delete a user (sessions cascade); `false` when the user does not exist.
    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO {} (username, password_hash, is_active, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.is_active)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", SELECT_COLUMNS, TABLE_NAME);
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let query = format!(
            "SELECT {} FROM {} WHERE username = $1",
            SELECT_COLUMNS, TABLE_NAME
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let query = format!(
            "UPDATE {} SET password_hash = COALESCE($2, password_hash), \
             is_active = COALESCE($3, is_active) \
             WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(changes.password_hash)
            .bind(changes.is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let query = format!("DELETE FROM {} WHERE id = $1", TABLE_NAME);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
