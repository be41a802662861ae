//! Member administration and self-service membership endpoints

use axum::{extract::State, Json};

use super::{ApiPath, ApiQuery, AuthenticatedUser, ValidatedJson};
use crate::{
    error::AppResult,
    models::{
        user::ExtendMembershipParams, MemberQuery, MembershipStatus, RegisterUser, Role,
        UpdateMember, User,
    },
    AppState,
};

/// Register a new member
#[utoipa::path(
    post,
    path = "/librarian/members",
    tag = "members",
    security(("bearer_auth" = [])),
    request_body = RegisterUser,
    responses(
        (status = 200, description = "Member created", body = User),
        (status = 400, description = "Invalid input or email taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_member(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> AppResult<Json<User>> {
    let member = state.services.users.register_user(input, Role::Member).await?;
    Ok(Json(member))
}

/// List all members
#[utoipa::path(
    get,
    path = "/librarian/members",
    tag = "members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All members", body = Vec<User>),
        (status = 403, description = "Librarian role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_members(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.all_members().await?))
}

/// Search members by ID or name
#[utoipa::path(
    get,
    path = "/librarian/members/search",
    tag = "members",
    security(("bearer_auth" = [])),
    params(MemberQuery),
    responses(
        (status = 200, description = "Matching members", body = Vec<User>)
    )
)]
pub async fn search_members(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MemberQuery>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.search_members(&query).await?))
}

/// Get member details by ID
#[utoipa::path(
    get,
    path = "/librarian/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = User),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(state.services.users.get_member(id).await?))
}

/// Update member profile fields
#[utoipa::path(
    put,
    path = "/librarian/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    request_body = UpdateMember,
    responses(
        (status = 200, description = "Member updated", body = User),
        (status = 400, description = "Invalid input or email taken", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateMember>,
) -> AppResult<Json<User>> {
    Ok(Json(state.services.users.update_member(id, changes).await?))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/librarian/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member deleted"),
        (status = 400, description = "Member has active borrowings", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<()> {
    state.services.users.delete_member(id).await
}

/// Extend a membership by a number of years
#[utoipa::path(
    post,
    path = "/librarian/members/{id}/extend-membership",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID"),
        ExtendMembershipParams
    ),
    responses(
        (status = 200, description = "Membership extended", body = User),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn extend_membership(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<ExtendMembershipParams>,
) -> AppResult<Json<User>> {
    let years = params.years.unwrap_or(1);
    Ok(Json(state.services.users.extend_membership(id, years).await?))
}

/// Membership validity of a member
#[utoipa::path(
    get,
    path = "/librarian/members/{id}/membership-status",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Membership status", body = MembershipStatus),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn membership_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MembershipStatus>> {
    Ok(Json(state.services.users.membership_status(id).await?))
}

/// Disable a member account
#[utoipa::path(
    post,
    path = "/librarian/members/{id}/disable",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member disabled", body = User),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn disable_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(state.services.users.disable_member(id).await?))
}

/// Re-enable a member account
#[utoipa::path(
    post,
    path = "/librarian/members/{id}/enable",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member enabled", body = User),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn enable_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(state.services.users.enable_member(id).await?))
}

/// Membership validity of the calling member
#[utoipa::path(
    get,
    path = "/member/membership-status",
    tag = "members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own membership status", body = MembershipStatus),
        (status = 403, description = "Member role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_membership_status(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> AppResult<Json<MembershipStatus>> {
    Ok(Json(state.services.users.own_membership_status(current.id).await?))
}
