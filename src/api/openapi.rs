//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, members};

/// Registers the bearer token scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /api/auth/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Library management REST API: catalog, members and authentication"
    ),
    paths(
        // Health
        health::liveness,
        health::readiness,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::search_books,
        books::available_books,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Members
        members::register_member,
        members::list_members,
        members::search_members,
        members::get_member,
        members::update_member,
        members::delete_member,
        members::extend_membership,
        members::membership_status,
        members::disable_member,
        members::enable_member,
        members::my_membership_status,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::User,
            crate::models::RegisterUser,
            crate::models::UpdateMember,
            crate::models::MembershipStatus,
            crate::models::Role,
            // Books
            crate::models::Book,
            crate::models::CreateBook,
            crate::models::UpdateBook,
            crate::models::BookStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "members", description = "Member administration and membership status")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
