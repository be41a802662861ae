//! Authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{ApiQuery, AuthenticatedUser, ValidatedJson};
use crate::{
    error::{AppError, AppResult},
    models::{user::not_blank, RegisterUser, Role, User},
    AppState,
};

/// Login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank", message = "Email is required"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    pub user: User,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegisterParams {
    /// MEMBER (default) or LIBRARIAN
    pub role: Option<String>,
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// Open a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    params(RegisterParams),
    request_body = RegisterUser,
    responses(
        (status = 200, description = "Account created", body = User),
        (status = 400, description = "Invalid input, unknown role or email taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RegisterParams>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> AppResult<Json<User>> {
    let role = match params.role.as_deref() {
        Some(code) => code.parse::<Role>().map_err(AppError::BadRequest)?,
        None => Role::Member,
    };

    let user = state.services.users.register_user(input, role).await?;
    Ok(Json(user))
}

/// Get current user profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(current.id).await?;
    Ok(Json(user))
}
