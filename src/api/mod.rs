//! HTTP layer: routes, extractors and response decoration

pub mod auth;
pub mod books;
pub mod health;
pub mod members;
pub mod openapi;

use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{
        header::{self, HeaderValue},
        request::Parts,
        Method,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{
    auth::{filter::access_filter, CurrentUser},
    config::CorsConfig,
    error::{AppError, ErrorResponse},
    AppState,
};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Health check
        .route("/health", get(health::liveness))
        .route("/ready", get(health::readiness))
        // Authentication
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/me", get(auth::me))
        // Catalog
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route("/books/available", get(books::available_books))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Member administration
        .route(
            "/librarian/members",
            get(members::list_members).post(members::register_member),
        )
        .route("/librarian/members/search", get(members::search_members))
        .route(
            "/librarian/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route(
            "/librarian/members/:id/extend-membership",
            post(members::extend_membership),
        )
        .route(
            "/librarian/members/:id/membership-status",
            get(members::membership_status),
        )
        .route("/librarian/members/:id/disable", post(members::disable_member))
        .route("/librarian/members/:id/enable", post(members::enable_member))
        // Self-service
        .route("/member/membership-status", get(members::my_membership_status))
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), access_filter))
        .with_state(state.clone());

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(middleware::from_fn(error_path))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    match config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                "Ignoring invalid CORS origin {:?}; cross-origin requests will be refused",
                config.allowed_origin
            );
            layer
        }
    }
}

async fn route_not_found(request: Request) -> AppError {
    AppError::NotFound(format!("No endpoint {} {}", request.method(), request.uri().path()))
}

/// Stamp the request path into every error body produced downstream.
///
/// Bare failures from the framework (405 from method routing, for one) get
/// the uniform body too; their `Allow` header is kept.
async fn error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;
    let status = response.status();

    let mut body = match response.extensions().get::<ErrorResponse>() {
        Some(body) => body.clone(),
        None if status.is_client_error() || status.is_server_error() => {
            ErrorResponse::for_status(status)
        }
        None => return response,
    };
    body.path = path;

    let mut decorated = body.into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        decorated.headers_mut().insert(header::ALLOW, allow.clone());
    }
    decorated
}

/// Identity resolved by the access filter
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                AppError::Authentication(
                    "Full authentication is required to access this resource".to_string(),
                )
            })
    }
}

/// JSON body that is deserialized and then checked with `validator`
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string extractor rejecting with the uniform error body
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Path parameter extractor rejecting with the uniform error body
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
