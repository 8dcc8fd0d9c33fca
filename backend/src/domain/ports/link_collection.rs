//! Driving port for the link collection embedded in a page.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::page::{Link, LinkDraft, LinkId};
use crate::domain::user::UserId;

/// Use cases around a page's ordered link entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkCollection: Send + Sync {
    /// Append a link to the caller's page; its position is the collection
    /// length at creation time. Fails with `NotFound` if the caller has no
    /// page.
    async fn add_link(&self, user_id: &UserId, draft: LinkDraft) -> Result<Link, Error>;

    /// Replace the display fields of the link matching `(user_id, link_id)`
    /// in place; position and click count are untouched. Fails with
    /// `NotFound` when unmatched.
    async fn update_link(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: LinkDraft,
    ) -> Result<(), Error>;

    /// Remove the link matching `(user_id, link_id)`. Fails with `NotFound`
    /// if no page or no matching link existed.
    async fn remove_link(&self, user_id: &UserId, link_id: &LinkId) -> Result<(), Error>;

    /// Public, unauthenticated: increment the counter of the link with
    /// `link_id`, whichever page contains it. Fails with `NotFound` when no
    /// page contains the id.
    async fn record_click(&self, link_id: &LinkId) -> Result<(), Error>;
}
