use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    context::RequestContext, error::AppError, state::AppState,
    utils::cookies::session_token_from_headers,
};

/// Resolves the `session_id` cookie to a user. Handlers behind this layer can
/// extract `Extension<User>` and a [`RequestContext`] carrying the caller.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token_from_headers(request.headers());
    let user = state.guard.resolve(token.as_deref()).await?;

    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(RequestContext::detached)
        .with_user(&user);
    tracing::Span::current().record("user_id", tracing::field::display(user.id));

    request.extensions_mut().insert(ctx);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
