//! Integration tests for the users resource

mod common;

use axum::http::StatusCode;
use common::{signup_payload, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_create_and_list_users() {
    let app = TestApp::new();
    let payload = signup_payload();

    let (status, created) = app.post("/api/users", &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], payload["email"]);
    assert!(created.get("password").is_none());

    let (status, users) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], created["id"]);
    assert!(users[0].get("password").is_none());
    assert!(users[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_created_user_can_log_in() {
    let app = TestApp::new();
    let payload = signup_payload();
    app.post("/api/users", &payload).await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            &json!({"email": payload["email"], "password": payload["password"]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_create_user_duplicate_email_conflicts() {
    let app = TestApp::new();
    let payload = signup_payload();
    app.post("/api/users", &payload).await;

    let (status, body) = app.post("/api/users", &payload).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/users", &json!({"name": "Ada"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email, password are required");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}
