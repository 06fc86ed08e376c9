//! JWT issuance for the booking frontend.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// JWT_SECRET is absent from the environment. Checked before any
    /// signing attempt so the failure is a configuration error, not a
    /// crypto one.
    #[error("JWT_SECRET is not configured")]
    MissingSecret,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Signs an HS256 credential for the given user id, valid for the
/// configured number of hours (24 by default).
pub fn issue_token(user_id: i64, config: &JwtConfig) -> Result<String, AuthError> {
    let secret = config.secret.as_deref().ok_or(AuthError::MissingSecret)?;

    let now = Utc::now();
    let claims = Claims {
        id: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.expires_in_hours)).timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}
