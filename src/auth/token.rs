use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::types::DoctorClaims;
use crate::shared::AppError;

/// Lifetime of an issued bearer token
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: Arc<str>,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
        }
    }

    /// Creates a signed HS256 token for the given doctor email
    #[instrument(skip(self, email))]
    pub fn issue_token(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;

        debug!(exp_timestamp = exp, "Creating JWT token with expiration");

        let claims = DoctorClaims {
            email: email.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates signature and expiry. Every failure collapses into
    /// `Unauthorized`; callers only learn accept or reject.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<DoctorClaims, AppError> {
        decode::<DoctorClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| {
            debug!(email = %data.claims.email, exp = data.claims.exp, "JWT token decoded successfully");
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Unauthorized("Invalid token".to_string())
        })
    }
}
