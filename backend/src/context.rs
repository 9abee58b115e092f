//! Request-scoped context passed explicitly through handlers and services.
//!
//! The request id middleware creates one per request and the auth middleware
//! adds the resolved caller. Nothing here lives in globals, so concurrent
//! requests never observe each other's identity.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{models::user::User, types::UserId};

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            user_id: None,
            username: None,
        }
    }

    /// Context for work that did not arrive through the HTTP stack.
    pub fn detached() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn with_user(mut self, user: &User) -> Self {
        self.user_id = Some(user.id);
        self.username = Some(user.username.clone());
        self
    }

    /// Username for log lines; `system` when nobody is authenticated.
    pub fn actor(&self) -> &str {
        self.username.as_deref().unwrap_or("system")
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::detached))
    }
}
