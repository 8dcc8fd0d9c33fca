//! Port for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// The store could not be reached.
    #[error("user store connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
    /// An insert violated the email or username unique index.
    #[error("user already exists")]
    Duplicate,
}

impl UserRepositoryError {
    /// Build a [`UserRepositoryError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`UserRepositoryError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Storage port for user records.
///
/// Email and username uniqueness is enforced by store-level unique indexes;
/// [`UserRepository::exists_with_email_or_username`] is an advisory pre-check
/// and must not be assumed race-free.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Single existence query matching either unique field.
    async fn exists_with_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, UserRepositoryError>;
}
