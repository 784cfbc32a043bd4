// Account Ledger - Web Server
// REST API with Axum over a single SQLite connection

use account_ledger::api::{router, AppState};
use account_ledger::telemetry::init_tracing;
use account_ledger::{open_database, Config, VERSION};
use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    info!(version = VERSION, ?config, "starting account server");

    // Schema failure is fatal: never bind without a usable store
    let conn = open_database(&config.db_path)?;
    info!(db_path = ?config.db_path, "database opened");

    let app = router(AppState::new(conn, config.api));

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
