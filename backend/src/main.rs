//! Backend entry-point: loads settings, checks the database and serves the API.

mod server;

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use registration::outbound::persistence::{DbPool, PoolConfig};
use registration::settings::{DatabaseSettings, ServerSettings};
use server::{ServerConfig, create_server};

const POOL_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

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

    let args = [OsString::from("registration")];
    let database = DatabaseSettings::load_from_iter(args.clone())
        .map_err(|e| std::io::Error::other(format!("database settings: {e}")))?;
    let server_settings = ServerSettings::load_from_iter(args)
        .map_err(|e| std::io::Error::other(format!("server settings: {e}")))?;

    let database_url = database
        .database_url()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(database.connection_limit())
            .with_connection_timeout(POOL_CHECKOUT_TIMEOUT),
    )
    .await
    .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;

    if let Err(e) = pool.probe().await {
        error!(error = %e, host = database.host(), "database connection failed");
        return Err(std::io::Error::other(format!("database probe: {e}")));
    }
    info!(host = database.host(), name = database.name(), "database connected");

    let config = ServerConfig::new(server_settings.bind_addr(), pool);
    info!(addr = %config.bind_addr, "starting http server");
    let server = create_server(&config)?;
    let result = server.await;

    config.db_pool.shutdown();
    result
}
