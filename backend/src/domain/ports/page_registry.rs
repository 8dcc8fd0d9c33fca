//! Driving port for page management, consumed by the HTTP adapter.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::page::{Page, PageDraft, PageUpdate};
use crate::domain::user::UserId;

/// Use cases around the one-page-per-user registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRegistry: Send + Sync {
    /// Create the caller's page, or replace its mutable fields if one already
    /// exists. The existing link collection is preserved on the update path.
    ///
    /// Idempotent under creation races: a duplicate-owner insert is recovered
    /// by returning the racing writer's page.
    async fn upsert_page(&self, user_id: &UserId, draft: PageDraft) -> Result<Page, Error>;

    /// Fetch the caller's own page. Fails with `NotFound` if none exists.
    async fn own_page(&self, user_id: &UserId) -> Result<Page, Error>;

    /// Public lookup by handle, including link click counts. No
    /// authentication. Fails with `NotFound` if none exists.
    async fn public_page(&self, username: &str) -> Result<Page, Error>;

    /// Apply the provided fields only; always bumps the updated timestamp.
    /// Fails with `NotFound` if the caller has no page.
    async fn update_page(&self, user_id: &UserId, update: PageUpdate) -> Result<Page, Error>;

    /// Delete the caller's page. Fails with `NotFound` if none existed.
    async fn delete_page(&self, user_id: &UserId) -> Result<(), Error>;
}
