use axum::http::StatusCode;
use serde_json::json;

use library_backend::{
    models::user::add_years,
    services::users::today,
};

use crate::support::{assert_error_body, TestApp, LIBRARIAN_EMAIL};

#[tokio::test]
async fn librarian_registers_and_fetches_members() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;

    let (status, created) = app
        .post(
            "/librarian/members",
            Some(&token),
            json!({ "email": "g@x.com", "password": "pw", "firstName": "Grace" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["role"], "MEMBER");
    assert_eq!(created["registrationDate"], today().to_string());
    assert_eq!(
        created["membershipExpiry"],
        add_years(today(), 1).unwrap().to_string()
    );

    let (status, fetched) = app
        .get(&format!("/librarian/members/{}", created["id"]), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], "g@x.com");
    assert!(fetched.get("password").is_none());
}

#[tokio::test]
async fn librarian_accounts_are_not_members() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;
    let librarian = app
        .state
        .services
        .users
        .find_by_email(LIBRARIAN_EMAIL)
        .await
        .unwrap()
        .unwrap();

    let uri = format!("/librarian/members/{}", librarian.id);
    let (status, body) = app.get(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body, 404, &uri);

    let (status, _) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let extend_uri = format!("{}/extend-membership?years=5", uri);
    let (status, body) = app.post(&extend_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body, 404, &format!("{}/extend-membership", uri));

    let status_uri = format!("{}/membership-status", uri);
    let (status, body) = app.get(&status_uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body, 404, &status_uri);

    let (_, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(me["membershipExpiry"], librarian.membership_expiry.to_string());
}

#[tokio::test]
async fn search_by_id_and_name() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;
    let ada = app.register_member("a@x.com", "Ada", "Lovelace").await;
    app.register_member("g@x.com", "Grace", "Hopper").await;

    let (status, body) = app
        .get(&format!("/librarian/members/search?id={}", ada), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["email"], "a@x.com");

    let (_, body) = app
        .get("/librarian/members/search?name=hopp", Some(&token))
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["lastName"], "Hopper");

    let (_, body) = app.get("/librarian/members/search?id=9999", Some(&token)).await;
    assert!(body.as_array().unwrap().is_empty());

    // seeded member plus the two registered above
    let (_, body) = app.get("/librarian/members/search", Some(&token)).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;
    let id = app.register_member("a@x.com", "Ada", "Lovelace").await;
    app.register_member("g@x.com", "Grace", "Hopper").await;
    let uri = format!("/librarian/members/{}", id);

    let (status, body) = app
        .put(&uri, Some(&token), json!({ "address": "12 Analytical Row" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "12 Analytical Row");
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["email"], "a@x.com");

    let (status, body) = app
        .put(&uri, Some(&token), json!({ "email": "g@x.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists: g@x.com");
}

#[tokio::test]
async fn extension_builds_on_running_membership() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;
    let id = app.register_member("a@x.com", "Ada", "Lovelace").await;
    let first_expiry = add_years(today(), 1).unwrap();

    let (status, body) = app
        .post(
            &format!("/librarian/members/{}/extend-membership?years=2", id),
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["membershipExpiry"],
        add_years(first_expiry, 2).unwrap().to_string()
    );

    let (_, body) = app
        .post(
            &format!("/librarian/members/{}/extend-membership", id),
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(
        body["membershipExpiry"],
        add_years(first_expiry, 3).unwrap().to_string()
    );
}

#[tokio::test]
async fn membership_status_reports_validity() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;
    let id = app.register_member("a@x.com", "Ada", "Lovelace").await;

    let (status, body) = app
        .get(&format!("/librarian/members/{}/membership-status", id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(
        body["expiryDate"],
        add_years(today(), 1).unwrap().to_string()
    );

    let (status, _) = app
        .get("/librarian/members/9999/membership-status", Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn member_reads_own_status_only_with_member_role() {
    let app = TestApp::spawn().await;

    let member = app.member_token().await;
    let (status, body) = app.get("/member/membership-status", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);

    let librarian = app.librarian_token().await;
    let (status, body) = app.get("/member/membership-status", Some(&librarian)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Member role required");
}

#[tokio::test]
async fn member_without_loans_is_deleted() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;
    let id = app.register_member("a@x.com", "Ada", "Lovelace").await;
    let uri = format!("/librarian/members/{}", id);

    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, _) = app.get(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
