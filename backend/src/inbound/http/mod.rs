//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod links;
pub mod pages;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use serde::Serialize;

/// Success envelope for operations that return no entity.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Human-readable outcome.
    pub message: String,
}

impl Message {
    /// Wrap a message string.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
