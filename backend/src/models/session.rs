//! Login sessions bound to a user.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::types::{SessionId, UserId};

/// Lifecycle of a session: `Active -> Expired`, with no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Expired,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
/// Database representation of a login session.
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// A missing expiry is treated as already expired.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Expiry is derived at read time: a session is expired from its
    /// `expires_at` instant onwards.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        match self.expires_at {
            Some(expires_at) if now < expires_at => SessionState::Active,
            _ => SessionState::Expired,
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == SessionState::Active
    }
}
