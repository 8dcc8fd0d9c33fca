//! Backend entry point: configuration, store connection, server bootstrap.

mod server;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use backend::domain::TokenService;
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::ensure_indexes;
use mongodb::Client;
use server::{ServerConfig, create_server};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_NAME: &str = "linkfolio";

/// Resolve the token-signing secret: env var, then file, then (debug builds
/// only) an ephemeral value.
fn load_signing_secret() -> std::io::Result<Vec<u8>> {
    if let Ok(secret) = env::var("LINKFOLIO_JWT_SECRET") {
        if !secret.is_empty() {
            return Ok(secret.into_bytes());
        }
    }
    if let Ok(path) = env::var("LINKFOLIO_JWT_SECRET_FILE") {
        return std::fs::read(&path).map_err(|e| {
            std::io::Error::other(format!("failed to read signing secret at {path}: {e}"))
        });
    }
    if cfg!(debug_assertions) {
        warn!("using an ephemeral signing secret (dev only); tokens will not survive restarts");
        return Ok(uuid::Uuid::new_v4().into_bytes().to_vec());
    }
    Err(std::io::Error::other(
        "LINKFOLIO_JWT_SECRET or LINKFOLIO_JWT_SECRET_FILE must be set",
    ))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = env::var("LINKFOLIO_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;

    let mongo_url =
        env::var("MONGO_URL").map_err(|_| std::io::Error::other("MONGO_URL must be set"))?;
    let db_name = env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_owned());

    let mut secret = load_signing_secret()?;
    let tokens = Arc::new(TokenService::new(&secret));
    secret.zeroize();

    let client = Client::with_uri_str(&mongo_url)
        .await
        .map_err(|e| std::io::Error::other(format!("mongodb connection failed: {e}")))?;
    let database = client.database(&db_name);
    ensure_indexes(&database)
        .await
        .map_err(|e| std::io::Error::other(format!("index bootstrap failed: {e}")))?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, database, tokens);
    info!(%bind_addr, database = %db_name, "starting linkfolio backend");
    create_server(health_state, config)?.await
}
