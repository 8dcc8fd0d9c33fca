//! User identity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier is not a valid UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The email address fails the structural check.
    #[error("email must be a non-empty address of at most {max} characters", max = EMAIL_MAX)]
    InvalidEmail,
    /// The username fails the length or character-set check.
    #[error(
        "username must be {min}-{max} characters of letters, digits, '_' or '-'",
        min = USERNAME_MIN,
        max = USERNAME_MAX
    )]
    InvalidUsername,
    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum accepted email length.
pub const EMAIL_MAX: usize = 254;

/// Contact address; also the login identifier.
///
/// The check is deliberately loose (non-empty, contains `@`, no surrounding
/// whitespace): deliverability is not this service's problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let valid = !email.is_empty()
            && email.len() <= EMAIL_MAX
            && email.trim() == email
            && email.contains('@');
        if valid {
            Ok(Self(email))
        } else {
            Err(UserValidationError::InvalidEmail)
        }
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum username length.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length.
pub const USERNAME_MAX: usize = 32;

/// Unique handle naming the user's public page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        let length_ok = (USERNAME_MIN..=USERNAME_MAX).contains(&username.chars().count());
        let charset_ok = username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if length_ok && charset_ok {
            Ok(Self(username))
        } else {
            Err(UserValidationError::InvalidUsername)
        }
    }

    /// The handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Plaintext password as received at the API boundary.
///
/// Deliberately not `Serialize`; it exists only long enough to be hashed or
/// verified.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validate and construct a [`Password`].
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(password))
    }

    /// Expose the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Application user.
///
/// The password hash never leaves the domain/persistence boundary; wire
/// representations are built from the other accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh user at signup time.
    pub fn new(email: Email, username: Username, password_hash: String) -> Self {
        Self {
            id: UserId::random(),
            email,
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a user from persisted parts.
    pub fn from_parts(
        id: UserId,
        email: Email,
        username: Username,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            username,
            password_hash,
            created_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Public handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored bcrypt hash.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Account creation instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
