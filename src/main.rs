//! tzdb-import entry point
//!
//! Opens one database, runs one import, exits. Scheduling (if any) is
//! external, e.g. a periodic job runner.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tzdb_import::config::ImporterConfig;
use tzdb_import::services::import_orchestrator::run_import;
use tzdb_import::services::timezonedb_client::TimeZoneDbClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tzdb-import");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ImporterConfig::load()?;
    info!("Database: {}", config.database_path.display());

    let pool = tzdb_import::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let client = TimeZoneDbClient::new(config.base_url.clone(), config.api_key.clone())?;

    let outcome = run_import(&pool, &client, config.rate_limit, config.buffer_secs).await?;
    info!(
        zones = outcome.zones_listed,
        details = outcome.details_fetched,
        merged = outcome.details_merged,
        errors = outcome.errors_logged,
        "tzdb-import finished"
    );

    pool.close().await;

    Ok(())
}
