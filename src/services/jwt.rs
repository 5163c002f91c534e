//! # JWT Service
//!
//! Bearer tokens stand in for the forum's session: a valid HS256 access token
//! names the current user in its `sub` claim. Only issuing and validating
//! access tokens lives here; login and refresh flows belong to the session
//! layer.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::utils::constant::ACCESS_TOKEN_EXPIRY;

/// Errors that can occur during JWT operations
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
}

/// Access token claims. `exp` and `iat` are Unix seconds.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Forum user id.
    pub sub: String,
    pub exp: u64,
    pub iat: u64,
}

/// Service for issuing and validating access tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(encoding_key: EncodingKey, decoding_key: DecodingKey) -> Self {
        Self {
            encoding_key,
            decoding_key,
        }
    }

    /// Builds both keys from one shared HMAC secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self::new(
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }

    /// Issues an access token for `user_id`.
    #[instrument(skip(self))]
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + ACCESS_TOKEN_EXPIRY.as_secs(),
            iat: now,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        trace!("Access token created");
        Ok(token)
    }

    /// Validates an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// - [`JwtError::TokenExpired`] - Token has expired
    /// - [`JwtError::InvalidToken`] - Token is malformed or has invalid signature
    #[instrument(skip_all)]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    debug!("Access token expired");
                    JwtError::TokenExpired
                }
                _ => {
                    debug!(error = %e, "Rejected access token");
                    JwtError::InvalidToken
                }
            })?;

        trace!(user_id = %data.claims.sub, "Access token accepted");
        Ok(data.claims)
    }
}
