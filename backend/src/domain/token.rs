//! Bearer token issuing and validation.
//!
//! Tokens are HS256 JWTs carrying the user id as subject and an absolute
//! expiry 24 hours after issue. The signing secret is process-wide and
//! read-only after startup; given it, this component is stateless.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Token lifetime: issue time plus 24 hours.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Errors raised when issuing or validating a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The embedded expiry has passed.
    #[error("Token expired")]
    Expired,
    /// Signature or structure is invalid, including an unparseable subject.
    #[error("Invalid token")]
    Malformed,
    /// The token could not be signed.
    #[error("token signing failed: {message}")]
    Signing {
        /// Underlying failure description.
        message: String,
    },
}

/// Signed bearer credential handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// The encoded token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Issues and validates bearer tokens with a process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Construct a service around the given signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The contract is "now >= expiry fails"; no grace window.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Issue a token whose subject is `user_id`.
    pub fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map(AccessToken)
            .map_err(|error| TokenError::Signing {
                message: error.to_string(),
            })
    }

    /// Validate a token and return the embedded user id.
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|error| {
            match error.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;
        UserId::new(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}
