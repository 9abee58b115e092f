use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::json;

mod support;

use support::{
    body_json, empty_request, extract_set_cookie_value, json_request, set_cookie_header, TestApp,
};

#[tokio::test]
async fn register_login_and_fetch_own_profile() {
    let app = TestApp::new();

    let response = app.register("alice", "pw1").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["username"], "alice");
    assert_eq!(created["is_active"], true);
    assert!(created.get("password_hash").is_none());

    let response = app.login_response("alice", "pw1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie_header(response.headers());
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=3600"));
    let token = extract_set_cookie_value(response.headers(), "session_id").expect("session cookie");
    assert_eq!(token.len(), 64);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["user_id"], created["id"]);

    let response = app
        .send(empty_request(Method::GET, "/users/me", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["username"], "alice");
}

#[tokio::test]
async fn logout_revokes_session_immediately() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice", "pw1").await;

    let response = app
        .send(empty_request(Method::POST, "/auth/logout", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookie_header(response.headers());
    assert!(cleared.starts_with("session_id=;"));
    assert!(cleared.contains("Max-Age=0"));

    let stored = app.store.session(&token).expect("session row is kept");
    assert!(stored.expires_at.is_some());

    let response = app
        .send(empty_request(Method::GET, "/users/me", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "SESSION_INVALID");
}

#[tokio::test]
async fn logout_twice_still_succeeds() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice", "pw1").await;

    for _ in 0..2 {
        let response = app
            .send(empty_request(Method::POST, "/auth/logout", Some(&token)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn logout_without_cookie_is_not_authenticated() {
    let app = TestApp::new();

    let response = app
        .send(empty_request(Method::POST, "/auth/logout", None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let app = TestApp::new();
    app.register("alice", "pw1").await;

    let wrong_password = app.login_response("alice", "pw2").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(extract_set_cookie_value(wrong_password.headers(), "session_id").is_none());
    let wrong_password = body_json(wrong_password).await;

    let unknown_user = app.login_response("nobody", "pw1").await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(unknown_user).await;

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(unknown_user["code"], "INVALID_CREDENTIALS");
    assert_eq!(app.store.session_count(), 0);
}

#[tokio::test]
async fn session_expires_after_ttl() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice", "pw1").await;

    app.clock.advance(Duration::minutes(59));
    let response = app
        .send(empty_request(Method::GET, "/users/me", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    app.clock.advance(Duration::minutes(1));
    let response = app
        .send(empty_request(Method::GET, "/users/me", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "SESSION_INVALID");
}

#[tokio::test]
async fn protected_routes_require_a_cookie() {
    let app = TestApp::new();

    let response = app
        .send(empty_request(Method::GET, "/users/me", None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "NOT_AUTHENTICATED");

    let response = app
        .send(empty_request(Method::GET, "/users/me", Some("forged-token")))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "SESSION_INVALID");
}

#[tokio::test]
async fn session_lookup_failure_is_a_server_error() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice", "pw1").await;

    app.store.fail_session_lookups(true);
    let response = app
        .send(empty_request(Method::GET, "/users/me", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_SERVER_ERROR");
}

#[tokio::test]
async fn concurrent_logins_yield_independent_sessions() {
    let app = TestApp::new();
    let (_, first) = app.signed_in("alice", "pw1").await;

    let response = app.login_response("alice", "pw1").await;
    let second = extract_set_cookie_value(response.headers(), "session_id").expect("cookie");
    assert_ne!(first, second);

    app.send(empty_request(Method::POST, "/auth/logout", Some(&first)))
        .await;
    let response = app
        .send(empty_request(Method::GET, "/users/me", Some(&second)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deactivated_user_cannot_log_in() {
    let app = TestApp::new();
    let (id, token) = app.signed_in("alice", "pw1").await;

    let response = app
        .send(json_request(
            Method::PUT,
            &format!("/users/{id}"),
            json!({ "is_active": false }),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_active"], false);

    let response = app.login_response("alice", "pw1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new();

    let mut request = empty_request(Method::GET, "/health/ping", None);
    request
        .headers_mut()
        .insert("x-request-id", "client-req-123".parse().unwrap());
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "client-req-123");
    assert_eq!(body_json(response).await["message"], "OK");

    let response = app
        .send(empty_request(Method::GET, "/users/me", None))
        .await;
    assert!(response.headers().contains_key("x-request-id"));
}
