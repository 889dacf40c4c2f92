//! Backend entry-point: loads settings, prepares storage and runs the HTTP server.

mod server;

use std::net::{IpAddr, SocketAddr};

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use yamdb::inbound::http::health::HealthState;
use yamdb::inbound::http::token_config::{BuildMode, token_key_from_env};
use yamdb::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use yamdb::settings::AppSettings;

fn bind_addr(settings: &AppSettings) -> std::io::Result<SocketAddr> {
    let host: IpAddr = settings.host().parse().map_err(|err| {
        std::io::Error::other(format!("invalid bind host '{}': {err}", settings.host()))
    })?;
    Ok(SocketAddr::new(host, settings.port()))
}

async fn connect(settings: &AppSettings, database_url: &str) -> std::io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let token_key = token_key_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(token_key, settings.clone(), bind_addr(&settings)?);
    if let Some(database_url) = settings.database_url.as_deref() {
        config = config.with_db_pool(connect(&settings, database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    health_state.mark_ready();
    server.await
}
