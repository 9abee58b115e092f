use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    context::RequestContext,
    error::AppError,
    handlers::auth::with_cookie,
    models::{
        user::{CreateUser, UpdateUser, User, UserResponse},
        MessageResponse,
    },
    services::ensure_owner,
    state::AppState,
    types::UserId,
    utils::cookies::build_clear_session_cookie,
};

pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .credentials
        .register(&ctx, &payload.username, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}

pub async fn get_me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ctx: RequestContext,
    user_id: Result<Path<UserId>, PathRejection>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Path(user_id) = user_id?;
    ensure_owner(user.id, user_id)?;
    let Json(payload) = payload?;
    payload.validate()?;

    let updated = state.credentials.update(&ctx, user_id, payload).await?;
    Ok(Json(UserResponse::from(updated)))
}

/// Deleting an account also drops its sessions, so the caller's cookie is cleared.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ctx: RequestContext,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(user_id) = user_id?;
    ensure_owner(user.id, user_id)?;

    state.credentials.delete(&ctx, user_id).await?;
    let cookie = build_clear_session_cookie(state.config.cookie_options());
    with_cookie(Json(MessageResponse::new("User deleted")), &cookie)
}
