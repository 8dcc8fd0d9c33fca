//! Link endpoints: append, update, delete, public click tracking.

use actix_web::{delete, post, put, web};
use serde::Deserialize;

use crate::domain::page::DEFAULT_LINK_ICON;
use crate::domain::{Error, Link, LinkDraft, LinkId};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, Message};

fn default_icon() -> String {
    DEFAULT_LINK_ICON.to_owned()
}

/// Link creation/update body.
#[derive(Debug, Deserialize)]
pub struct LinkBody {
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Display glyph; falls back to the default glyph.
    #[serde(default = "default_icon")]
    pub icon: String,
}

impl TryFrom<LinkBody> for LinkDraft {
    type Error = Error;

    fn try_from(body: LinkBody) -> Result<Self, Self::Error> {
        Self::new(body.title, body.url, body.icon)
            .map_err(|error| Error::invalid_request(error.to_string()))
    }
}

/// A syntactically invalid id cannot match any link; report the same 404 as
/// an unknown one.
fn parse_link_id(raw: &str) -> ApiResult<LinkId> {
    LinkId::new(raw).map_err(|_| Error::not_found("Link not found"))
}

/// Append a link to the caller's page.
#[post("/linkpage/links")]
pub async fn add_link(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    body: web::Json<LinkBody>,
) -> ApiResult<web::Json<Link>> {
    let draft = LinkDraft::try_from(body.into_inner())?;
    let link = state.links.add_link(auth.user_id(), draft).await?;
    Ok(web::Json(link))
}

/// Replace a link's display fields in place.
#[put("/linkpage/links/{id}")]
pub async fn update_link(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<LinkBody>,
) -> ApiResult<web::Json<Message>> {
    let link_id = parse_link_id(&path.into_inner())?;
    let draft = LinkDraft::try_from(body.into_inner())?;
    state
        .links
        .update_link(auth.user_id(), &link_id, draft)
        .await?;
    Ok(web::Json(Message::new("Link updated successfully")))
}

/// Remove a link from the caller's page.
#[delete("/linkpage/links/{id}")]
pub async fn remove_link(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let link_id = parse_link_id(&path.into_inner())?;
    state.links.remove_link(auth.user_id(), &link_id).await?;
    Ok(web::Json(Message::new("Link deleted successfully")))
}

/// Public, unauthenticated click tracking.
#[post("/linkpage/links/{id}/click")]
pub async fn record_click(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let link_id = parse_link_id(&path.into_inner())?;
    state.links.record_click(&link_id).await?;
    Ok(web::Json(Message::new("Click tracked")))
}
