//! Profile page aggregate: one public page per user, holding an ordered
//! collection of links.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::user::{UserId, Username};

/// Default page description.
pub const DEFAULT_DESCRIPTION: &str = "";
/// Default page theme colour.
pub const DEFAULT_THEME_COLOR: &str = "#3B82F6";
/// Default page theme font.
pub const DEFAULT_THEME_FONT: &str = "font-sans";
/// Default link icon glyph.
pub const DEFAULT_LINK_ICON: &str = "🔗";

/// Validation errors for page and link fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageValidationError {
    /// The identifier is not a valid UUID.
    #[error("id must be a valid UUID")]
    InvalidId,
    /// The link target is not an absolute URL.
    #[error("url must be a valid absolute URL")]
    InvalidUrl,
}

/// Stable page identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageId(Uuid);

impl PageId {
    /// Validate and construct a [`PageId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PageValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| PageValidationError::InvalidId)
    }

    /// Generate a new random [`PageId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PageId> for String {
    fn from(value: PageId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PageId {
    type Error = PageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stable link identifier.
///
/// Link ids are globally unique even though a link belongs to exactly one
/// page: the public click operation looks a link up by bare id across all
/// pages and relies on that uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkId(Uuid);

impl LinkId {
    /// Validate and construct a [`LinkId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PageValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| PageValidationError::InvalidId)
    }

    /// Generate a new random [`LinkId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<LinkId> for String {
    fn from(value: LinkId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for LinkId {
    type Error = PageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One entry on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// Globally unique link identifier.
    pub id: LinkId,
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Display glyph.
    pub icon: String,
    /// Append index assigned at creation; never renumbered, so deletions
    /// leave gaps.
    pub order: u32,
    /// Monotonically non-decreasing click counter.
    pub clicks: u64,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Create a link from a validated draft at the given append index.
    pub fn new(draft: LinkDraft, order: u32) -> Self {
        Self {
            id: LinkId::random(),
            title: draft.title,
            url: draft.url,
            icon: draft.icon,
            order,
            clicks: 0,
            created_at: Utc::now(),
        }
    }
}

/// Validated input for creating or replacing a link's display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDraft {
    /// Display title.
    pub title: String,
    /// Target URL; validated absolute.
    pub url: String,
    /// Display glyph.
    pub icon: String,
}

impl LinkDraft {
    /// Validate and construct a [`LinkDraft`].
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        icon: impl Into<String>,
    ) -> Result<Self, PageValidationError> {
        let url = url.into();
        Url::parse(&url).map_err(|_| PageValidationError::InvalidUrl)?;
        Ok(Self {
            title: title.into(),
            url,
            icon: icon.into(),
        })
    }
}

/// A user's public link-listing profile.
///
/// ## Invariants
/// - At most one page exists per user id (store-enforced unique index).
/// - `username` denormalizes the owner's handle at creation time; it is not
///   refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Stable page identifier.
    pub id: PageId,
    /// Owning user; unique across pages.
    pub user_id: UserId,
    /// Owner handle used for the public lookup.
    pub username: Username,
    /// Page title.
    pub title: String,
    /// Page description.
    pub description: String,
    /// Theme colour.
    pub theme_color: String,
    /// Theme font.
    pub theme_font: String,
    /// Ordered link collection.
    pub links: Vec<Link>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Create a fresh page with an empty link collection.
    pub fn new(user_id: UserId, username: Username, draft: PageDraft) -> Self {
        let now = Utc::now();
        Self {
            id: PageId::random(),
            user_id,
            username,
            title: draft.title,
            description: draft.description,
            theme_color: draft.theme_color,
            theme_font: draft.theme_font,
            links: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Creation fields for a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDraft {
    /// Page title.
    pub title: String,
    /// Page description.
    pub description: String,
    /// Theme colour.
    pub theme_color: String,
    /// Theme font.
    pub theme_font: String,
}

/// Partial update: only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageUpdate {
    /// Replacement title, if provided.
    pub title: Option<String>,
    /// Replacement description, if provided.
    pub description: Option<String>,
    /// Replacement theme colour, if provided.
    pub theme_color: Option<String>,
    /// Replacement theme font, if provided.
    pub theme_font: Option<String>,
}

impl From<PageDraft> for PageUpdate {
    /// The upsert's update path replaces exactly the creation fields.
    fn from(draft: PageDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            theme_color: Some(draft.theme_color),
            theme_font: Some(draft.theme_font),
        }
    }
}
