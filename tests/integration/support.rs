//! Router harness over the in-memory store

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use library_backend::{
    api, repository::Repository, services::bootstrap::seed_default_accounts, AppConfig, AppState,
};

pub const LIBRARIAN_EMAIL: &str = "librarian@library.com";
pub const LIBRARIAN_PASSWORD: &str = "librarian123";
pub const MEMBER_EMAIL: &str = "member@library.com";
pub const MEMBER_PASSWORD: &str = "member123";

pub struct TestApp {
    pub router: Router,
    pub repository: Repository,
    pub state: AppState,
}

impl TestApp {
    /// Fresh application with the default accounts seeded
    pub async fn spawn() -> Self {
        let repository = Repository::in_memory();
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let state = AppState::new(config, repository.clone());
        seed_default_accounts(&state.services.users, &state.config.bootstrap)
            .await
            .unwrap();

        Self {
            router: api::create_router(state.clone()),
            repository,
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn librarian_token(&self) -> String {
        self.login(LIBRARIAN_EMAIL, LIBRARIAN_PASSWORD).await
    }

    pub async fn member_token(&self) -> String {
        self.login(MEMBER_EMAIL, MEMBER_PASSWORD).await
    }

    /// Register a member through the public endpoint and return its id
    pub async fn register_member(&self, email: &str, first_name: &str, last_name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "password": "password1",
                    "firstName": first_name,
                    "lastName": last_name
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Add a book as the default librarian and return it
    pub async fn add_book(&self, token: &str, body: Value) -> Value {
        let (status, book) = self.post("/books", Some(token), body).await;
        assert_eq!(status, StatusCode::OK, "book creation failed: {}", book);
        book
    }
}

pub fn book_json(isbn: &str, title: &str, total: i32) -> Value {
    json!({
        "isbn": isbn,
        "title": title,
        "author": "Ursula K. Le Guin",
        "category": "Fantasy",
        "publicationYear": 1968,
        "totalCopies": total
    })
}

/// Every failure body carries exactly these fields
pub fn assert_error_body(body: &Value, status: u16, path: &str) {
    let object = body.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["error", "message", "path", "status", "timestamp"]);
    assert_eq!(body["status"], status);
    assert_eq!(body["path"], path);
    assert!(body["message"].is_string());
}
