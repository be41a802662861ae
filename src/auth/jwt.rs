//! Stateless bearer tokens
//!
//! Tokens are HS512 JWTs carrying the user id as `sub`. There is no
//! revocation list: a token stays valid until `exp`, whatever happens to the
//! account in the meantime.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

const ALGORITHM: Algorithm = Algorithm::HS512;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let lifetime_secs = i64::try_from(config.jwt_expiration_hours)
            .unwrap_or(i64::MAX)
            .saturating_mul(3600);

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Issue a token for `user_id`, valid from now for the configured lifetime
    pub fn issue(&self, user_id: i64) -> AppResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> AppResult<String> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat.saturating_add(self.lifetime_secs),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify signature and expiry and return the embedded user id.
    ///
    /// Every failure collapses into the same `Authentication` error.
    pub fn validate(&self, token: &str) -> AppResult<i64> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("JWT validation error: {}", e);
                invalid_token()
            })?
            .claims;

        claims.sub.parse().map_err(|_| {
            tracing::debug!("JWT subject is not a user id: {}", claims.sub);
            invalid_token()
        })
    }
}

fn invalid_token() -> AppError {
    AppError::Authentication("Invalid or expired token".to_string())
}
