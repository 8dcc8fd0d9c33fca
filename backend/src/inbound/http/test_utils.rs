//! Shared fixtures for HTTP handler tests.

use std::sync::Arc;

use actix_web::web;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

use crate::domain::ports::{MockAccountDirectory, MockLinkCollection, MockPageRegistry};
use crate::domain::{TokenService, UserId};
use crate::inbound::http::state::HttpState;

/// Signing secret shared by handler tests.
pub const TEST_SECRET: &[u8] = b"handler-test-secret";

/// State with the given mocks and a real token service over [`TEST_SECRET`].
pub fn state_with(
    accounts: MockAccountDirectory,
    pages: MockPageRegistry,
    links: MockLinkCollection,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(accounts),
        Arc::new(pages),
        Arc::new(links),
        Arc::new(TokenService::new(TEST_SECRET)),
    ))
}

/// State whose mocks expect no calls at all.
pub fn test_state() -> web::Data<HttpState> {
    state_with(
        MockAccountDirectory::new(),
        MockPageRegistry::new(),
        MockLinkCollection::new(),
    )
}

/// A valid `Authorization` header value for `user_id`.
pub fn bearer_for(tokens: &TokenService, user_id: &UserId) -> String {
    let token = tokens.issue(user_id).expect("token issues");
    format!("Bearer {}", token.as_str())
}

#[derive(Serialize)]
struct StaleClaims {
    sub: String,
    exp: i64,
}

/// An `Authorization` header value whose token expired five minutes ago.
pub fn expired_bearer(user_id: &UserId) -> String {
    let claims = StaleClaims {
        sub: user_id.to_string(),
        exp: (Utc::now() - Duration::minutes(5)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("encode succeeds");
    format!("Bearer {token}")
}
