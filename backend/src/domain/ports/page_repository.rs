//! Port for page persistence adapters.
//!
//! All mutations are single-document operations; the adapter is expected to
//! provide atomic append, positional update, pull, and increment semantics so
//! the service layer never needs read-modify-write cycles for link state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::page::{Link, LinkDraft, LinkId, Page, PageUpdate};
use crate::domain::user::UserId;

/// Persistence errors raised by page repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRepositoryError {
    /// The store could not be reached.
    #[error("page store connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("page store query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
    /// An insert violated the one-page-per-user unique index.
    #[error("page already exists for this user")]
    DuplicateOwner,
}

impl PageRepositoryError {
    /// Build a [`PageRepositoryError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`PageRepositoryError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Storage port for page records and their embedded link collections.
///
/// The `bool` results report whether the targeted document (and, for link
/// operations, the targeted embedded link) was matched; `false` means
/// "nothing to operate on", which services surface as not-found.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Insert a new page. Fails with [`PageRepositoryError::DuplicateOwner`]
    /// when the owner already has one.
    async fn insert(&self, page: &Page) -> Result<(), PageRepositoryError>;

    /// Fetch the page owned by `user_id`.
    async fn find_by_user_id(&self, user_id: &UserId)
    -> Result<Option<Page>, PageRepositoryError>;

    /// Fetch a page by its owner's handle.
    async fn find_by_username(&self, username: &str) -> Result<Option<Page>, PageRepositoryError>;

    /// Apply the provided fields of `update` and stamp `updated_at`.
    async fn set_fields(
        &self,
        user_id: &UserId,
        update: &PageUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError>;

    /// Delete the page owned by `user_id`.
    async fn delete(&self, user_id: &UserId) -> Result<bool, PageRepositoryError>;

    /// Atomically append `link` to the owner's collection and stamp
    /// `updated_at`.
    async fn push_link(
        &self,
        user_id: &UserId,
        link: &Link,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError>;

    /// Atomically replace the display fields of the link matching
    /// `(user_id, link_id)` and stamp `updated_at`. Position and click count
    /// are untouched.
    async fn set_link_fields(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: &LinkDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError>;

    /// Atomically remove the link matching `(user_id, link_id)` and stamp
    /// `updated_at`. Remaining links keep their positions.
    async fn pull_link(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError>;

    /// Atomically increment the click counter of the link with `link_id`,
    /// whichever page contains it. Does not stamp `updated_at`.
    async fn increment_clicks(&self, link_id: &LinkId) -> Result<bool, PageRepositoryError>;
}
