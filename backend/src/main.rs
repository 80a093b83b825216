use std::sync::Arc;

use anyhow::{Context, Result};
use backend::{axum_http::http_serve, config::config_loader};
use eventhub::infra::db::postgres::postgres_connection;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = ?err, "backend: exited with error");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    eventhub::observability::init_observability("backend")?;

    let config = config_loader::load().context("failed to load backend configuration")?;
    info!(stage = %config_loader::get_stage(), "backend: configuration loaded");

    let db_pool = postgres_connection::establish_connection(&config.database.url)?;
    info!("backend: postgres pool ready");

    http_serve::start(Arc::new(config), Arc::new(db_pool)).await
}
