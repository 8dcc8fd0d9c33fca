//! MongoDB-backed [`PageRepository`] implementation.
//!
//! Every mutation is a single `update_one`/`delete_one` so the store's
//! document-level atomicity covers the link-array invariants. The `bool`
//! results come from `matched_count`; filters that name `links.id` make a
//! missing link indistinguishable from a missing page on purpose.

use async_trait::async_trait;
use bson::{Document, doc};
use chrono::{DateTime, Utc};
use mongodb::{Collection, Database};
use tracing::debug;

use crate::domain::page::{Link, LinkDraft, LinkId, Page, PageUpdate};
use crate::domain::ports::{PageRepository, PageRepositoryError};
use crate::domain::user::UserId;

use super::documents::{LinkDocument, PAGES_COLLECTION, PageDocument};
use super::{is_connection_error, is_duplicate_key};

/// Mongo adapter over the `linkpages` collection.
#[derive(Clone)]
pub struct MongoPageRepository {
    pages: Collection<PageDocument>,
}

impl MongoPageRepository {
    /// Create a repository over the given database handle.
    pub fn new(database: &Database) -> Self {
        Self {
            pages: database.collection(PAGES_COLLECTION),
        }
    }

    async fn find_one(
        &self,
        filter: Document,
    ) -> Result<Option<Page>, PageRepositoryError> {
        let document = self
            .pages
            .find_one(filter)
            .await
            .map_err(map_store_error)?;
        document
            .map(Page::try_from)
            .transpose()
            .map_err(|error| PageRepositoryError::query(error.to_string()))
    }

    async fn update_matching(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<bool, PageRepositoryError> {
        let result = self
            .pages
            .update_one(filter, update)
            .await
            .map_err(map_store_error)?;
        Ok(result.matched_count > 0)
    }
}

fn map_store_error(error: mongodb::error::Error) -> PageRepositoryError {
    debug!(%error, "page store operation failed");
    if is_connection_error(&error) {
        PageRepositoryError::connection(error.to_string())
    } else {
        PageRepositoryError::query(error.to_string())
    }
}

fn stamp(updated_at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_chrono(updated_at)
}

fn set_document(update: &PageUpdate, updated_at: DateTime<Utc>) -> Document {
    let mut set = doc! { "updated_at": stamp(updated_at) };
    if let Some(title) = &update.title {
        set.insert("title", title.as_str());
    }
    if let Some(description) = &update.description {
        set.insert("description", description.as_str());
    }
    if let Some(theme_color) = &update.theme_color {
        set.insert("theme_color", theme_color.as_str());
    }
    if let Some(theme_font) = &update.theme_font {
        set.insert("theme_font", theme_font.as_str());
    }
    set
}

#[async_trait]
impl PageRepository for MongoPageRepository {
    async fn insert(&self, page: &Page) -> Result<(), PageRepositoryError> {
        self.pages
            .insert_one(PageDocument::from(page))
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_duplicate_key(&error) {
                    PageRepositoryError::DuplicateOwner
                } else {
                    map_store_error(error)
                }
            })
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Page>, PageRepositoryError> {
        self.find_one(doc! { "user_id": user_id.to_string() }).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Page>, PageRepositoryError> {
        self.find_one(doc! { "username": username }).await
    }

    async fn set_fields(
        &self,
        user_id: &UserId,
        update: &PageUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError> {
        self.update_matching(
            doc! { "user_id": user_id.to_string() },
            doc! { "$set": set_document(update, updated_at) },
        )
        .await
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, PageRepositoryError> {
        let result = self
            .pages
            .delete_one(doc! { "user_id": user_id.to_string() })
            .await
            .map_err(map_store_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn push_link(
        &self,
        user_id: &UserId,
        link: &Link,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError> {
        let link_document = bson::to_bson(&LinkDocument::from(link))
            .map_err(|error| PageRepositoryError::query(error.to_string()))?;
        self.update_matching(
            doc! { "user_id": user_id.to_string() },
            doc! {
                "$push": { "links": link_document },
                "$set": { "updated_at": stamp(updated_at) },
            },
        )
        .await
    }

    async fn set_link_fields(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: &LinkDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError> {
        self.update_matching(
            doc! { "user_id": user_id.to_string(), "links.id": link_id.to_string() },
            doc! {
                "$set": {
                    "links.$.title": draft.title.as_str(),
                    "links.$.url": draft.url.as_str(),
                    "links.$.icon": draft.icon.as_str(),
                    "updated_at": stamp(updated_at),
                },
            },
        )
        .await
    }

    async fn pull_link(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, PageRepositoryError> {
        // Matching `links.id` in the filter makes "page without that link"
        // a miss rather than a no-op success.
        self.update_matching(
            doc! { "user_id": user_id.to_string(), "links.id": link_id.to_string() },
            doc! {
                "$pull": { "links": { "id": link_id.to_string() } },
                "$set": { "updated_at": stamp(updated_at) },
            },
        )
        .await
    }

    async fn increment_clicks(&self, link_id: &LinkId) -> Result<bool, PageRepositoryError> {
        // Cross-owner lookup by bare link id; link ids are globally unique.
        self.update_matching(
            doc! { "links.id": link_id.to_string() },
            doc! { "$inc": { "links.$.clicks": 1 } },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_document_includes_only_provided_fields() {
        let update = PageUpdate {
            title: Some("new title".to_owned()),
            description: None,
            theme_color: Some("#EF4444".to_owned()),
            theme_font: None,
        };
        let set = set_document(&update, Utc::now());

        assert_eq!(set.get_str("title").expect("title set"), "new title");
        assert_eq!(set.get_str("theme_color").expect("colour set"), "#EF4444");
        assert!(!set.contains_key("description"));
        assert!(!set.contains_key("theme_font"));
        assert!(set.contains_key("updated_at"));
    }

    #[test]
    fn empty_update_still_stamps_updated_at() {
        let set = set_document(&PageUpdate::default(), Utc::now());
        assert_eq!(set.len(), 1);
        assert!(matches!(
            set.get("updated_at"),
            Some(bson::Bson::DateTime(_))
        ));
    }
}
