//! Integration tests for the login and home screen endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bombinha::{app::build_app, auth::IdentityProvider, state::AppState, users::UserStore};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create(app: &Router, name: &str, email: &str, password: &str) -> Value {
    let (status, json) = send_json(
        app,
        "POST",
        "/api/v1/home/users",
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create {email}: {json}");
    json
}

#[tokio::test]
async fn test_create_user_then_list() {
    let state = AppState::in_memory();
    let app = build_app(state.clone());

    let user = create(&app, "Ana", "ana@x.com", "abcd1234").await;
    assert_eq!(user["name"], "Ana");
    assert_eq!(user["email"], "ana@x.com");

    let account = state
        .identity
        .sign_in("ana@x.com", "abcd1234")
        .await
        .expect("account created alongside the record");
    assert_eq!(user["userId"], account.id.to_string());

    let (status, list) = send_json(&app, "GET", "/api/v1/home/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([user]));
}

#[tokio::test]
async fn test_create_rejects_password_length() {
    let state = AppState::in_memory();
    let app = build_app(state.clone());

    for password in ["abc123", "abcdefghijklmno"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/home/users",
            Some(json!({ "name": "Ana", "email": "ana@x.com", "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "password must be between 8 and 14 characters"
        );
    }
    assert!(state.users.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let state = AppState::in_memory();
    let app = build_app(state.clone());
    create(&app, "Ana", "ana@x.com", "abcd1234").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/home/users",
        Some(json!({ "name": "Ana 2", "email": "ana@x.com", "password": "abcd5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(String::from_utf8(body).unwrap(), "email already in use");
    assert_eq!(state.users.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_user_changes_only_target() {
    let app = build_app(AppState::in_memory());
    let a = create(&app, "Ana", "ana@x.com", "abcd1234").await;
    let b = create(&app, "Bia", "bia@x.com", "abcd1234").await;

    let (status, out) = send_json(
        &app,
        "PUT",
        &format!("/api/v1/home/users/{}", a["id"].as_str().unwrap()),
        Some(json!({ "name": "Ana Maria", "email": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["user"]["name"], "Ana Maria");
    assert_eq!(out["user"]["userId"], a["userId"]);
    assert_eq!(out["warnings"], json!([]));

    let (_, list) = send_json(&app, "GET", "/api/v1/home/users", None).await;
    assert_eq!(list[0]["name"], "Ana Maria");
    assert_eq!(list[1], b);
}

#[tokio::test]
async fn test_delete_user_removes_only_that_id() {
    let state = AppState::in_memory();
    let app = build_app(state.clone());
    let a = create(&app, "Ana", "ana@x.com", "abcd1234").await;
    let b = create(&app, "Bia", "bia@x.com", "abcd1234").await;

    let a_id = a["id"].as_str().unwrap();
    let (status, out) = send_json(&app, "DELETE", &format!("/api/v1/home/users/{a_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["deleted"], a["id"]);

    let (_, list) = send_json(&app, "GET", "/api/v1/home/users", None).await;
    assert_eq!(list, json!([b]));

    // the deleted record's own account is gone, the other one survives
    assert!(state.identity.sign_in("ana@x.com", "abcd1234").await.is_err());
    assert!(state.identity.sign_in("bia@x.com", "abcd1234").await.is_ok());

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/home/users/{a_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_messages_and_navigation() {
    let app = build_app(AppState::in_memory());
    create(&app, "Ana", "ana@x.com", "abcd1234").await;

    for (email, password, status, message) in [
        ("ana", "abcd1234", StatusCode::BAD_REQUEST, "incorrect email"),
        ("nobody@x.com", "abcd1234", StatusCode::UNAUTHORIZED, "user not found"),
        ("ana@x.com", "bad-pass-1", StatusCode::UNAUTHORIZED, "incorrect password"),
    ] {
        let (got, body) = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(got, status);
        assert_eq!(String::from_utf8(body).unwrap(), message);
    }

    let (status, session) = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        Some(json!({ "email": "ana@x.com", "password": "abcd1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["navigate"], "/home");
    assert_eq!(session["account"]["email"], "ana@x.com");

    let token = session["access_token"].as_str().unwrap();
    let request = Request::builder()
        .uri("/api/v1/me")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = build_app(AppState::in_memory());
    create(&app, "Ana", "ana@x.com", "abcd1234").await;
    let (_, session) = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        Some(json!({ "email": "ana@x.com", "password": "abcd1234" })),
    )
    .await;

    let (status, refreshed) = send_json(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        Some(json!({ "refresh_token": session["refresh_token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["account"]["id"], session["account"]["id"]);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        Some(json!({ "refresh_token": session["access_token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_home_is_reachable_without_session() {
    let app = build_app(AppState::in_memory());
    create(&app, "Ana", "ana@x.com", "abcd1234").await;

    let (status, view) = send_json(&app, "GET", "/home", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["screen"], "home");
    assert_eq!(view["users"].as_array().unwrap().len(), 1);
    assert_eq!(view["feedbackTtlMs"], 3000);

    let (status, _) = send(&app, "GET", "/home/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, view) = send_json(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view, json!({ "screen": "login" }));

    let (status, _) = send(&app, "GET", "/api/v1/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_rejects_garbage_token() {
    let app = build_app(AppState::in_memory());
    let (status, _) = send(&app, "GET", "/api/v1/auth/verify?token=garbage", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
