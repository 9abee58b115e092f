//! Session repository trait and its PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{models::session::Session, repositories::common::StoreError, types::SessionId};

const SELECT_COLUMNS: &str = "session_id, user_id, created_at, expires_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &Session) -> Result<(), StoreError>;

    async fn find(&self, session_id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Sets `expires_at = now` if the session is still active at `now`.
    /// Returns whether a row changed; unknown or already-expired sessions are left alone.
    async fn expire(&self, session_id: &SessionId, now: DateTime<Utc>)
        -> Result<bool, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (session_id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&session.session_id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, session_id: &SessionId) -> Result<Option<Session>, StoreError> {
        let query = format!(
            "SELECT {} FROM user_sessions WHERE session_id = $1",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Session>(&query)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn expire(
        &self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE user_sessions
            SET expires_at = $2
            WHERE session_id = $1
              AND expires_at > $2
            "#,
        )
        .bind(session_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
