#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    models::{
        transaction::TransactionResponse,
        user::{CreateUser, LoginRequest, LoginResponse, UpdateUser, UserResponse},
        MessageResponse, PageQuery, PaginatedResponse,
    },
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

pub const SESSION_SECURITY_SCHEME: &str = "SessionCookie";

#[derive(OpenApi)]
#[openapi(
    paths(
        create_user_doc,
        me_doc,
        update_user_doc,
        delete_user_doc,
        login_doc,
        logout_doc,
        convert_doc,
        list_transactions_doc,
        health_doc
    ),
    components(
        schemas(
            CreateUser,
            UpdateUser,
            UserResponse,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ErrorResponse,
            TransactionResponse
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Users", description = "Account registration and management"),
        (name = "Auth", description = "Session login and logout"),
        (name = "Exchange", description = "Currency conversion"),
        (name = "Transactions", description = "Conversion history"),
        (name = "Health", description = "Liveness probe")
    ),
    security(("SessionCookie" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            SESSION_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_id"))),
        );
    }
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid username or password", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    ),
    tag = "Users",
    security(())
)]
fn create_user_doc() {}

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse)
    ),
    tag = "Users"
)]
fn me_doc() {}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "Id of the caller's own account")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Not the caller's account", body = ErrorResponse)
    ),
    tag = "Users"
)]
fn update_user_doc() {}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "Id of the caller's own account")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Not the caller's account", body = ErrorResponse),
        (status = 409, description = "User has recorded transactions", body = ErrorResponse)
    ),
    tag = "Users"
)]
fn delete_user_doc() {}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out; session cookie cleared", body = MessageResponse),
        (status = 401, description = "No session cookie", body = ErrorResponse)
    ),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/exchange/convert/{from}/{to}/{amount}",
    params(
        ("from" = String, Path, description = "Source currency code, e.g. USD"),
        ("to" = String, Path, description = "Target currency code, e.g. BRL"),
        ("amount" = f64, Path, description = "Non-negative amount in the source currency")
    ),
    responses(
        (status = 200, description = "Conversion recorded", body = TransactionResponse),
        (status = 400, description = "Invalid currency or amount", body = ErrorResponse),
        (status = 502, description = "Exchange rate provider failure", body = ErrorResponse)
    ),
    tag = "Exchange"
)]
fn convert_doc() {}

#[utoipa::path(
    get,
    path = "/transaction/{user_id}",
    params(
        ("user_id" = i64, Path, description = "Id of the caller's own account"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Conversion history, newest first", body = PaginatedResponse<TransactionResponse>),
        (status = 403, description = "Not the caller's account", body = ErrorResponse)
    ),
    tag = "Transactions"
)]
fn list_transactions_doc() {}

#[utoipa::path(
    get,
    path = "/health/{check}",
    params(("check" = String, Path, description = "Configured HEALTH_CHECK segment")),
    responses((status = 200, description = "Service is up", body = MessageResponse)),
    tag = "Health",
    security(())
)]
fn health_doc() {}
