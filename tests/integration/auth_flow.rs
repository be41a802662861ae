use axum::http::StatusCode;
use serde_json::json;

use crate::support::{assert_error_body, TestApp, MEMBER_EMAIL};

#[tokio::test]
async fn member_is_locked_out_of_librarian_routes() {
    let app = TestApp::spawn().await;
    let member_id = app.register_member("a@x.com", "Ada", "Lovelace").await;
    let member_token = app.login("a@x.com", "password1").await;

    let (status, body) = app.get("/librarian/members", Some(&member_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_body(&body, 403, "/librarian/members");
    assert_eq!(body["message"], "Librarian role required");

    let librarian_token = app.librarian_token().await;
    let (status, body) = app.get("/librarian/members", Some(&librarian_token)).await;
    assert_eq!(status, StatusCode::OK);
    let members = body.as_array().unwrap();
    assert!(members
        .iter()
        .any(|m| m["id"] == member_id && m["email"] == "a@x.com"));
    assert!(members.iter().all(|m| m["role"] == "MEMBER"));
}

#[tokio::test]
async fn login_returns_bearer_token_and_profile() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": MEMBER_EMAIL, "password": "member123" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["email"], MEMBER_EMAIL);
    assert_eq!(body["user"]["role"], "MEMBER");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn wrong_password_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": MEMBER_EMAIL, "password": "wrong" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, 400, "/api/auth/login");
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn register_honours_role_parameter() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/auth/register?role=LIBRARIAN",
            None,
            json!({ "email": "staff@x.com", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "LIBRARIAN");
    assert_eq!(body["enabled"], true);

    let (status, body) = app
        .post(
            "/api/auth/register?role=JANITOR",
            None,
            json!({ "email": "j@x.com", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown role code: JANITOR");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = TestApp::spawn().await;
    app.register_member("a@x.com", "Ada", "Lovelace").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "a@x.com", "password": "other" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists: a@x.com");
}

#[tokio::test]
async fn registration_validates_email_and_password() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "not-an-email", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, 400, "/api/auth/register");

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "b@x.com", "password": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_body(&body, 401, "/api/auth/me");

    let (status, _) = app.get("/api/auth/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.librarian_token().await;
    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "LIBRARIAN");
    assert_eq!(body["firstName"], "System");
}

#[tokio::test]
async fn disabled_member_cannot_log_in_but_keeps_issued_token() {
    let app = TestApp::spawn().await;
    let member_id = app.register_member("a@x.com", "Ada", "Lovelace").await;
    let member_token = app.login("a@x.com", "password1").await;
    let librarian_token = app.librarian_token().await;

    let (status, body) = app
        .post(
            &format!("/librarian/members/{}/disable", member_id),
            Some(&librarian_token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], false);

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "a@x.com", "password": "password1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .get("/member/membership-status", Some(&member_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);

    app.post(
        &format!("/librarian/members/{}/enable", member_id),
        Some(&librarian_token),
        json!({}),
    )
    .await;
    app.login("a@x.com", "password1").await;
}
