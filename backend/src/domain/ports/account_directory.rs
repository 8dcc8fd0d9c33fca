//! Driving port for account management, consumed by the HTTP adapter.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::token::AccessToken;
use crate::domain::user::{Email, Password, User, UserId, Username};

/// Validated signup input.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    /// Login email; globally unique.
    pub email: Email,
    /// Public handle; globally unique.
    pub username: Username,
    /// Plaintext password, hashed before storage.
    pub password: Password,
}

/// Login input.
///
/// The email is kept as a raw string: an address that fails signup validation
/// simply matches no account, and login must not reveal which part was wrong.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: Password,
}

/// A successfully authenticated account: the user plus a fresh bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated user.
    pub user: User,
    /// Freshly issued bearer token.
    pub token: AccessToken,
}

/// Use cases around user records and credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Create an account and issue a token.
    ///
    /// Fails with `Conflict` when the email or username is already taken.
    async fn signup(&self, request: SignupRequest) -> Result<AuthSession, Error>;

    /// Authenticate by email and password and issue a token.
    ///
    /// Fails with a single `Unauthorized` "Invalid credentials" whether the
    /// email is unknown or the password wrong.
    async fn login(&self, request: LoginRequest) -> Result<AuthSession, Error>;

    /// Resolve the user behind a validated token subject.
    ///
    /// Fails with `Unauthorized` when no record exists for the id.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
