//! Credential check and token issuance

use crate::{
    auth::{jwt::TokenService, password::verify_password},
    error::{AppError, AppResult},
    models::User,
    services::users::UsersService,
};

#[derive(Clone)]
pub struct AuthService {
    users: UsersService,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: UsersService, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Authenticate by email and password and return a fresh token.
    ///
    /// Unknown email, wrong password and disabled accounts all fail the same
    /// way so the response does not leak which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &user.password)? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(invalid_credentials());
        }

        if !user.enabled {
            tracing::debug!(user_id = user.id, "Login rejected: account disabled");
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }
}

fn invalid_credentials() -> AppError {
    AppError::BadRequest("Invalid email or password".to_string())
}
