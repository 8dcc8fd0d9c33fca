//! BSON document types stored in MongoDB.
//!
//! Documents mirror the domain aggregates field for field; conversions in
//! both directions keep serde details (`_id`, BSON datetimes) out of the
//! domain layer. Deserialised documents re-run domain validation so corrupt
//! records surface as explicit errors instead of panics.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::page::PageValidationError;
use crate::domain::user::UserValidationError;
use crate::domain::{Link, LinkId, Page, PageId, User, UserId, Username};

/// Users collection name.
pub const USERS_COLLECTION: &str = "users";
/// Pages collection name.
pub const PAGES_COLLECTION: &str = "linkpages";

/// A stored record failed domain validation on the way out of the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// A user record held an invalid field.
    #[error("corrupt user record: {0}")]
    User(#[from] UserValidationError),
    /// A page or link record held an invalid field.
    #[error("corrupt page record: {0}")]
    Page(#[from] PageValidationError),
}

/// Stored user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    /// UUID string; doubles as the document key.
    #[serde(rename = "_id")]
    pub id: String,
    /// Login email; unique index.
    pub email: String,
    /// Public handle; unique index.
    pub username: String,
    /// bcrypt hash.
    pub password_hash: String,
    /// Account creation instant.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            username: user.username().to_string(),
            password_hash: user.password_hash().to_owned(),
            created_at: user.created_at(),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = DocumentError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        Ok(Self::from_parts(
            UserId::new(&doc.id)?,
            crate::domain::Email::new(doc.email)?,
            Username::new(doc.username)?,
            doc.password_hash,
            doc.created_at,
        ))
    }
}

/// Stored link sub-record, embedded in a page document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDocument {
    /// UUID string; globally unique so the click lookup can match on it
    /// alone.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Display glyph.
    pub icon: String,
    /// Append index.
    pub order: u32,
    /// Click counter.
    pub clicks: u64,
    /// Creation instant.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<&Link> for LinkDocument {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.to_string(),
            title: link.title.clone(),
            url: link.url.clone(),
            icon: link.icon.clone(),
            order: link.order,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}

impl TryFrom<LinkDocument> for Link {
    type Error = DocumentError;

    fn try_from(doc: LinkDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LinkId::new(&doc.id)?,
            title: doc.title,
            url: doc.url,
            icon: doc.icon,
            order: doc.order,
            clicks: doc.clicks,
            created_at: doc.created_at,
        })
    }
}

/// Stored page record embedding its ordered link array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    /// UUID string; doubles as the document key.
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning user id; unique index.
    pub user_id: String,
    /// Owner handle; non-unique index for the public lookup.
    pub username: String,
    /// Page title.
    pub title: String,
    /// Page description.
    pub description: String,
    /// Theme colour.
    pub theme_color: String,
    /// Theme font.
    pub theme_font: String,
    /// Ordered link collection.
    pub links: Vec<LinkDocument>,
    /// Creation instant.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Page> for PageDocument {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id.to_string(),
            user_id: page.user_id.to_string(),
            username: page.username.to_string(),
            title: page.title.clone(),
            description: page.description.clone(),
            theme_color: page.theme_color.clone(),
            theme_font: page.theme_font.clone(),
            links: page.links.iter().map(LinkDocument::from).collect(),
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

impl TryFrom<PageDocument> for Page {
    type Error = DocumentError;

    fn try_from(doc: PageDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PageId::new(&doc.id)?,
            user_id: UserId::new(&doc.user_id)?,
            username: Username::new(doc.username)?,
            title: doc.title,
            description: doc.description,
            theme_color: doc.theme_color,
            theme_font: doc.theme_font,
            links: doc
                .links
                .into_iter()
                .map(Link::try_from)
                .collect::<Result<_, _>>()?,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::{DEFAULT_THEME_COLOR, DEFAULT_THEME_FONT};
    use crate::domain::{Email, LinkDraft, PageDraft};

    fn sample_user() -> User {
        User::new(
            Email::new("ada@example.com").expect("valid email"),
            Username::new("ada").expect("valid username"),
            "$2b$04$hash".to_owned(),
        )
    }

    fn sample_page() -> Page {
        let mut page = Page::new(
            UserId::random(),
            Username::new("ada").expect("valid username"),
            PageDraft {
                title: "Ada's Links".to_owned(),
                description: String::new(),
                theme_color: DEFAULT_THEME_COLOR.to_owned(),
                theme_font: DEFAULT_THEME_FONT.to_owned(),
            },
        );
        let draft = LinkDraft::new("GitHub", "https://github.com", "💻").expect("valid draft");
        let mut link = Link::new(draft, 0);
        link.clicks = 7;
        page.links.push(link);
        page
    }

    #[test]
    fn user_round_trips_through_its_document() {
        let user = sample_user();
        let restored = User::try_from(UserDocument::from(&user)).expect("valid document");
        assert_eq!(restored.id(), user.id());
        assert_eq!(restored.email(), user.email());
        assert_eq!(restored.password_hash(), user.password_hash());
    }

    #[test]
    fn user_document_uses_the_id_as_document_key() {
        let doc = bson::to_document(&UserDocument::from(&sample_user()))
            .expect("document serialises");
        assert!(doc.contains_key("_id"));
        assert!(!doc.contains_key("id"));
        assert!(matches!(doc.get("created_at"), Some(bson::Bson::DateTime(_))));
    }

    #[test]
    fn page_round_trips_preserving_link_state() {
        let page = sample_page();
        let restored = Page::try_from(PageDocument::from(&page)).expect("valid document");
        assert_eq!(restored, page);
        assert_eq!(restored.links[0].clicks, 7);
        assert_eq!(restored.links[0].order, 0);
    }

    #[test]
    fn corrupt_link_id_is_reported_not_swallowed() {
        let mut doc = PageDocument::from(&sample_page());
        doc.links[0].id = "not-a-uuid".to_owned();
        let error = Page::try_from(doc).expect_err("corrupt record");
        assert!(matches!(error, DocumentError::Page(_)));
    }
}
