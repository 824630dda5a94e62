//! Server entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use revision_tracker::inbound::http::health::HealthState;
use revision_tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use revision_tracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, TrackerSettings, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = TrackerSettings::load().wrap_err("failed to load TRACKER settings")?;
    let session =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .wrap_err("invalid session configuration")?;
    let bind_addr = settings
        .socket_addr()
        .wrap_err("TRACKER_BIND_ADDR is not a socket address")?;

    let mut config = ServerConfig::new(session.key, session.cookie_secure, bind_addr);
    if let Some(url) = settings.database_url() {
        run_pending_migrations(url)
            .await
            .wrap_err("database migrations failed")?;
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "revision tracker listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated abnormally")
}
