use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    docs::ApiDoc,
    handlers,
    middleware::{log_error_responses, request_id, require_session},
    state::AppState,
};

pub fn public_routes(health_path: &str) -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::users::create_user))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route(health_path, get(handlers::health::health))
}

pub fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::users::get_me))
        .route(
            "/users/{user_id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route(
            "/exchange/convert/{from}/{to}/{amount}",
            get(handlers::exchange::convert),
        )
        .route(
            "/transaction/{user_id}",
            get(handlers::transactions::list_transactions),
        )
        .route_layer(from_fn_with_state(state, require_session))
}

/// Full application: routes, docs and the shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    let health_path = format!("/health/{}", state.config.health_check_path);
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes(&health_path))
        .merge(session_routes(state.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(from_fn(log_error_responses)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(24 * 60 * 60))
}
