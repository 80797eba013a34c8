use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use persistence::repositories::RecordRepository;
use records_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Records API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let records = Arc::new(RecordRepository::new(pool));
    let addr = config
        .socket_addr()
        .context("Invalid server.host / server.port")?;
    let app = app::create_app(config, records);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
