//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::TokenService;
use mongodb::Database;

/// Pre-resolved configuration for creating the HTTP server.
///
/// Everything in here is immutable after startup; request handling never
/// mutates process-wide state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database: Database,
    pub(crate) tokens: Arc<TokenService>,
}

impl ServerConfig {
    /// Bundle the bind address, store handle, and token service.
    pub fn new(bind_addr: SocketAddr, database: Database, tokens: Arc<TokenService>) -> Self {
        Self {
            bind_addr,
            database,
            tokens,
        }
    }

    /// The socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
