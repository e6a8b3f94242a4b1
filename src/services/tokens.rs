//! Signed token codec for confirmation links and sessions

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::{AppError, AppResult},
    models::Role,
};

/// Tokens without an embedded expiry are only honored this long after issuance
const MAX_UNBOUNDED_AGE_SECS: i64 = 3600;

/// Registration waiting for its confirmation link to be followed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
}

impl PendingRegistration {
    fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.email.is_empty() && !self.password_hash.is_empty()
    }
}

/// Identity carried by a session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i32,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenClaims {
    Confirmation(PendingRegistration),
    Session(SessionClaims),
}

/// Payload as it travels inside the JWT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaims {
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    pub claims: TokenClaims,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Current time is past the embedded `exp`
    PastExpiry,
    /// No `exp` embedded and `iat` is outside the fixed window
    IssuedTooLongAgo,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,
    #[error("Token expired")]
    Expired(Expiry),
    #[error("Unexpected token kind")]
    WrongKind,
    #[error("Incomplete token claims")]
    Incomplete,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign `claims`, expiring `ttl` from now
    pub fn issue(&self, claims: TokenClaims, ttl: Duration) -> AppResult<String> {
        let now = Utc::now().timestamp();
        self.sign(SignedClaims {
            iat: now,
            exp: Some(now + ttl.num_seconds()),
            claims,
        })
    }

    pub(crate) fn sign(&self, payload: SignedClaims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify signature and freshness
    pub fn validate(&self, token: &str) -> Result<SignedClaims, TokenError> {
        // Expiry is checked below so that a missing `exp` can fall back to `iat`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let payload = decode::<SignedClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Malformed)?
            .claims;

        check_freshness(payload.iat, payload.exp, Utc::now().timestamp())?;
        Ok(payload)
    }

    pub fn validate_session(&self, token: &str) -> Result<SessionClaims, TokenError> {
        match self.validate(token)?.claims {
            TokenClaims::Session(session) => Ok(session),
            TokenClaims::Confirmation(_) => Err(TokenError::WrongKind),
        }
    }

    pub fn validate_confirmation(&self, token: &str) -> Result<PendingRegistration, TokenError> {
        match self.validate(token)?.claims {
            TokenClaims::Confirmation(pending) if pending.is_complete() => Ok(pending),
            TokenClaims::Confirmation(_) => Err(TokenError::Incomplete),
            TokenClaims::Session(_) => Err(TokenError::WrongKind),
        }
    }
}

/// A token stays valid through its expiry second
fn check_freshness(iat: i64, exp: Option<i64>, now: i64) -> Result<(), TokenError> {
    match exp {
        Some(exp) if now > exp => Err(TokenError::Expired(Expiry::PastExpiry)),
        None if now - iat > MAX_UNBOUNDED_AGE_SECS => {
            Err(TokenError::Expired(Expiry::IssuedTooLongAgo))
        }
        _ => Ok(()),
    }
}
