//! Access filter: resolves the bearer token into a [`CurrentUser`] and
//! enforces the [`RoutePolicy`](super::policy::RoutePolicy) before dispatch.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use super::{policy::Access, CurrentUser};
use crate::{
    error::{AppError, AppResult},
    AppState,
};

pub async fn access_filter(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access = state.policy.evaluate(request.method(), request.uri().path());

    // Public routes serve anonymously when the caller cannot be resolved
    let identity = match authenticate(&state, request.headers()).await {
        Ok(identity) => identity,
        Err(e) if access == Access::Public => {
            tracing::warn!(
                path = request.uri().path(),
                "Serving public route anonymously, caller lookup failed: {}",
                e
            );
            None
        }
        Err(e) => return Err(e),
    };

    match access {
        Access::Public => {}
        Access::Authenticated => {
            if identity.is_none() {
                return Err(unauthenticated());
            }
        }
        Access::Role(role) => match &identity {
            None => return Err(unauthenticated()),
            Some(user) if user.role != role => {
                tracing::debug!(
                    user_id = user.id,
                    path = request.uri().path(),
                    "Access denied: {} role required",
                    role
                );
                return Err(AppError::Authorization(format!(
                    "{} role required",
                    role.display_name()
                )));
            }
            Some(_) => {}
        },
    }

    if let Some(user) = identity {
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

/// Resolve the caller from the `Authorization` header.
///
/// A missing, malformed or invalid token leaves the request anonymous. Store
/// failures are returned to the caller.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<Option<CurrentUser>> {
    let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
        return Ok(None);
    };

    let Ok(user_id) = state.services.tokens.validate(bearer.token()) else {
        return Ok(None);
    };

    let user = state.services.users.find_by_id(user_id).await?;
    if user.is_none() {
        tracing::debug!(user_id, "Token refers to a user that no longer exists");
    }
    Ok(user.as_ref().map(CurrentUser::from))
}

fn unauthenticated() -> AppError {
    AppError::Authentication("Full authentication is required to access this resource".to_string())
}
