//! Backend entry-point: loads settings, wires storage, and serves the jokes API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use jokes::inbound::http::health::HealthState;
use jokes::inbound::http::session_config::fingerprint::secrets_fingerprints;
use jokes::inbound::http::session_config::{BuildMode, session_settings_from_env};
use jokes::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use jokes::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    for (position, fingerprint) in secrets_fingerprints(&session.secrets).iter().enumerate() {
        info!(position, fingerprint = %fingerprint, "session signing secret loaded");
    }

    let mut config =
        ServerConfig::new(session, bind_addr).with_bcrypt_cost(settings.bcrypt_cost());
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "jokes server listening");
    server.await
}

/// Apply migrations, then open the connection pool.
async fn connect_database(database_url: &str) -> io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|e| io::Error::other(format!("database migration failed: {e}")))?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| io::Error::other(format!("database pool creation failed: {e}")))?;
    info!("database pool ready");
    Ok(pool)
}
