use anyhow::{Context, Result};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use storefront::{config::Config, handler::AppRouter, state::AppState};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("storefront", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let _guard = init_logger(
        telemetry.logger_provider(),
        "storefront",
        is_dev,
        is_enable_file,
    );

    let pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to migrate database")?;
    }

    let state = AppState::new(pool, &config);

    info!("✅ Storefront setup completed, listening on port {}", config.port);

    let served = AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server");

    info!("🛑 Shutting down storefront...");

    if let Err(e) = telemetry.shutdown().await {
        error!("Failed to shutdown telemetry: {e}");
    }

    served
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    info!("🗄️ Migrations applied");
    Ok(())
}
