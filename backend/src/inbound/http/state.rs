//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::TokenService;
use crate::domain::ports::{AccountDirectory, LinkCollection, PageRegistry};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account use cases: signup, login, token-subject resolution.
    pub accounts: Arc<dyn AccountDirectory>,
    /// Page registry use cases.
    pub pages: Arc<dyn PageRegistry>,
    /// Link collection use cases.
    pub links: Arc<dyn LinkCollection>,
    /// Token validation for bearer extraction.
    pub tokens: Arc<TokenService>,
}

impl HttpState {
    /// Bundle the port implementations handlers need.
    pub fn new(
        accounts: Arc<dyn AccountDirectory>,
        pages: Arc<dyn PageRegistry>,
        links: Arc<dyn LinkCollection>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            accounts,
            pages,
            links,
            tokens,
        }
    }
}
