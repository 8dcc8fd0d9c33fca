//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers declare an [`AuthenticatedUser`] parameter; extraction validates
//! the `Authorization: Bearer` header against the shared [`TokenService`] and
//! yields the token's subject. Only `/me` goes on to resolve the full user
//! record — everything else operates on the subject id alone.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::token::TokenError;
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// The validated subject of the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: UserId,
}

impl AuthenticatedUser {
    /// The authenticated user's id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("authentication state not configured"))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Missing authorization header"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid authorization header"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("Invalid authorization header"))?;

    let user_id = state.tokens.validate(token).map_err(|error| match error {
        TokenError::Expired => Error::unauthorized("Token expired"),
        _ => Error::unauthorized("Invalid token"),
    })?;
    Ok(AuthenticatedUser { user_id })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req).map_err(Into::into))
    }
}
