use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    context::RequestContext,
    error::AppError,
    models::{
        user::{LoginRequest, LoginResponse},
        MessageResponse,
    },
    state::AppState,
    utils::cookies::{build_clear_session_cookie, build_session_cookie, session_token_from_headers},
};

pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let outcome = state
        .authenticator
        .login(&ctx, &payload.username, &payload.password)
        .await?;

    let max_age = state
        .sessions
        .ttl()
        .to_std()
        .map_err(|e| AppError::InternalServerError(e.into()))?;
    let cookie = build_session_cookie(
        outcome.session.session_id.as_str(),
        max_age,
        state.config.cookie_options(),
    );

    let body = LoginResponse {
        message: "Login successful".to_string(),
        user_id: outcome.user.id,
        username: outcome.user.username,
    };
    with_cookie(Json(body), &cookie)
}

pub async fn logout(
    State(state): State<AppState>,
    ctx: RequestContext,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = session_token_from_headers(&headers);
    state.authenticator.logout(&ctx, token.as_deref()).await?;

    let cookie = build_clear_session_cookie(state.config.cookie_options());
    with_cookie(Json(MessageResponse::new("Logout successful")), &cookie)
}

pub(crate) fn with_cookie(body: impl IntoResponse, cookie: &str) -> Result<Response, AppError> {
    let value =
        HeaderValue::from_str(cookie).map_err(|e| AppError::InternalServerError(e.into()))?;
    let mut response = body.into_response();
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}
