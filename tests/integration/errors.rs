use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};

use crate::support::{assert_error_body, TestApp};

#[tokio::test]
async fn unknown_route_needs_identity_then_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/nowhere", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_body(&body, 401, "/nowhere");
    assert_eq!(
        body["message"],
        "Full authentication is required to access this resource"
    );

    let token = app.member_token().await;
    let (status, body) = app.get("/nowhere", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body, 404, "/nowhere");
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, 400, "/api/auth/login");
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn bad_query_parameter_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;

    let (status, body) = app
        .get("/librarian/members/search?id=abc", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, 400, "/librarian/members/search");
}

#[tokio::test]
async fn health_checks_are_public() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.get("/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books/{id}"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/books")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
}

#[tokio::test]
async fn unsupported_method_gets_the_uniform_body() {
    let app = TestApp::spawn().await;
    let token = app.librarian_token().await;
    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/books/1")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_error_body(&body, 405, "/books/1");
    assert_eq!(body["error"], "Method Not Allowed");
}

#[tokio::test]
async fn anonymous_head_on_catalog_is_allowed() {
    let app = TestApp::spawn().await;
    let (status, _) = app.request(Method::HEAD, "/books", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
