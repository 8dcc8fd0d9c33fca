//! Page registry and link collection service.
//!
//! One service implements both driving ports: the link operations are
//! single-document mutations on the same aggregate the registry manages.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::domain::error::Error;
use crate::domain::page::{Link, LinkDraft, LinkId, Page, PageDraft, PageUpdate};
use crate::domain::ports::{
    LinkCollection, PageRegistry, PageRepository, PageRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::user::UserId;

const PAGE_NOT_FOUND_MESSAGE: &str = "Link page not found";
const LINK_NOT_FOUND_MESSAGE: &str = "Link not found";
const PAGE_CREATE_FAILED_MESSAGE: &str = "Error creating link page";

/// [`PageRegistry`] and [`LinkCollection`] implementation over the page
/// repository. The user repository is consulted only on the creation path to
/// denormalize the owner's handle into the page.
#[derive(Clone)]
pub struct PageService<P, U> {
    pages: Arc<P>,
    users: Arc<U>,
}

impl<P, U> PageService<P, U> {
    /// Create a service with the given repositories.
    pub fn new(pages: Arc<P>, users: Arc<U>) -> Self {
        Self { pages, users }
    }
}

impl<P, U> PageService<P, U>
where
    P: PageRepository,
    U: UserRepository,
{
    fn map_page_error(error: PageRepositoryError) -> Error {
        match error {
            PageRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("page store unavailable: {message}"))
            }
            PageRepositoryError::Query { message } => {
                Error::internal(format!("page store error: {message}"))
            }
            PageRepositoryError::DuplicateOwner => {
                Error::internal("unexpected duplicate page owner")
            }
        }
    }

    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            _ => Error::internal(format!("user store error: {error}")),
        }
    }

    async fn fetch_own_page(&self, user_id: &UserId) -> Result<Option<Page>, Error> {
        self.pages
            .find_by_user_id(user_id)
            .await
            .map_err(Self::map_page_error)
    }

    /// Refetch after a mutation that proved the page exists. A `None` here
    /// means a racing delete won; that surfaces as a 500.
    async fn refetch_own_page(&self, user_id: &UserId, context: &str) -> Result<Page, Error> {
        self.fetch_own_page(user_id)
            .await?
            .ok_or_else(|| Error::internal(context.to_owned()))
    }
}

#[async_trait]
impl<P, U> PageRegistry for PageService<P, U>
where
    P: PageRepository,
    U: UserRepository,
{
    async fn upsert_page(&self, user_id: &UserId, draft: PageDraft) -> Result<Page, Error> {
        if self.fetch_own_page(user_id).await?.is_some() {
            // Replace only the creation fields; the link collection is
            // deliberately left untouched.
            self.pages
                .set_fields(user_id, &PageUpdate::from(draft), Utc::now())
                .await
                .map_err(Self::map_page_error)?;
            return self
                .refetch_own_page(user_id, PAGE_CREATE_FAILED_MESSAGE)
                .await;
        }

        let owner = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized("User not found"))?;

        let page = Page::new(user_id.clone(), owner.username().clone(), draft);
        match self.pages.insert(&page).await {
            Ok(()) => {
                info!(user_id = %user_id, username = %page.username, "link page created");
                Ok(page)
            }
            Err(PageRepositoryError::DuplicateOwner) => {
                // Lost the creation race; the unique owner index guarantees
                // the winner's page is the one to return.
                debug!(user_id = %user_id, "page creation race recovered");
                self.refetch_own_page(user_id, PAGE_CREATE_FAILED_MESSAGE)
                    .await
            }
            Err(error) => Err(Self::map_page_error(error)),
        }
    }

    async fn own_page(&self, user_id: &UserId) -> Result<Page, Error> {
        self.fetch_own_page(user_id)
            .await?
            .ok_or_else(|| Error::not_found(PAGE_NOT_FOUND_MESSAGE))
    }

    async fn public_page(&self, username: &str) -> Result<Page, Error> {
        self.pages
            .find_by_username(username)
            .await
            .map_err(Self::map_page_error)?
            .ok_or_else(|| Error::not_found(PAGE_NOT_FOUND_MESSAGE))
    }

    async fn update_page(&self, user_id: &UserId, update: PageUpdate) -> Result<Page, Error> {
        let matched = self
            .pages
            .set_fields(user_id, &update, Utc::now())
            .await
            .map_err(Self::map_page_error)?;
        if !matched {
            return Err(Error::not_found(PAGE_NOT_FOUND_MESSAGE));
        }
        self.refetch_own_page(user_id, PAGE_NOT_FOUND_MESSAGE).await
    }

    async fn delete_page(&self, user_id: &UserId) -> Result<(), Error> {
        let deleted = self
            .pages
            .delete(user_id)
            .await
            .map_err(Self::map_page_error)?;
        if !deleted {
            return Err(Error::not_found(PAGE_NOT_FOUND_MESSAGE));
        }
        info!(user_id = %user_id, "link page deleted");
        Ok(())
    }
}

#[async_trait]
impl<P, U> LinkCollection for PageService<P, U>
where
    P: PageRepository,
    U: UserRepository,
{
    async fn add_link(&self, user_id: &UserId, draft: LinkDraft) -> Result<Link, Error> {
        let page = self
            .fetch_own_page(user_id)
            .await?
            .ok_or_else(|| Error::not_found(PAGE_NOT_FOUND_MESSAGE))?;

        // Append index; gaps from deletions are never reused.
        let order = u32::try_from(page.links.len())
            .map_err(|_| Error::internal("link collection exceeds addressable size"))?;
        let link = Link::new(draft, order);

        let matched = self
            .pages
            .push_link(user_id, &link, Utc::now())
            .await
            .map_err(Self::map_page_error)?;
        if !matched {
            return Err(Error::not_found(PAGE_NOT_FOUND_MESSAGE));
        }
        Ok(link)
    }

    async fn update_link(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: LinkDraft,
    ) -> Result<(), Error> {
        let matched = self
            .pages
            .set_link_fields(user_id, link_id, &draft, Utc::now())
            .await
            .map_err(Self::map_page_error)?;
        if matched {
            Ok(())
        } else {
            Err(Error::not_found(LINK_NOT_FOUND_MESSAGE))
        }
    }

    async fn remove_link(&self, user_id: &UserId, link_id: &LinkId) -> Result<(), Error> {
        let matched = self
            .pages
            .pull_link(user_id, link_id, Utc::now())
            .await
            .map_err(Self::map_page_error)?;
        if matched {
            Ok(())
        } else {
            Err(Error::not_found(LINK_NOT_FOUND_MESSAGE))
        }
    }

    async fn record_click(&self, link_id: &LinkId) -> Result<(), Error> {
        let matched = self
            .pages
            .increment_clicks(link_id)
            .await
            .map_err(Self::map_page_error)?;
        if matched {
            Ok(())
        } else {
            Err(Error::not_found(LINK_NOT_FOUND_MESSAGE))
        }
    }
}
