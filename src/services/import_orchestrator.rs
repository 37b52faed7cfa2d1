//! Import run orchestration
//!
//! One run: list fetch → rate-limited detail fetch → persistence, all writes
//! in a single transaction committed at the end. Recoverable fetch errors
//! become error_log rows and the run continues; an empty zone list is the
//! one fatal condition and ends the run before the summary table is touched.
//! Database driver failures propagate and abort.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info};

use super::batch_fetcher;
use super::timezonedb_client::TimeZoneDbClient;
use crate::db::import as db_import;
use crate::error::Result;

/// Statistics for one completed (or early-exited) import run.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub zones_listed: usize,
    pub details_fetched: usize,
    pub details_merged: u64,
    pub errors_logged: usize,
}

/// Run one import against the given database and API client.
pub async fn run_import(
    pool: &SqlitePool,
    client: &TimeZoneDbClient,
    rate_limit: f64,
    buffer_secs: f64,
) -> Result<ImportOutcome> {
    let mut tx = pool.begin().await?;
    let mut outcome = ImportOutcome::default();

    let time_zones = match client.list_time_zones().await {
        Ok(zones) => zones,
        Err(list_error) => {
            error!(error = %list_error, "Zone list fetch failed");
            db_import::log_error(&mut tx, &list_error).await?;
            outcome.errors_logged += 1;
            Vec::new()
        }
    };

    // A failed or empty list leaves previously imported data untouched;
    // only the error log row survives this run.
    if time_zones.is_empty() {
        db_import::log_error(&mut tx, "No data received from API. List query failed.").await?;
        outcome.errors_logged += 1;
        tx.commit().await?;
        return Ok(outcome);
    }

    outcome.zones_listed = time_zones.len();
    info!(zones = outcome.zones_listed, "Fetched time zone list");

    // One timestamp for every row written this run.
    let import_time = Utc::now();

    db_import::replace_time_zones(&mut tx, &time_zones, import_time).await?;

    let batch =
        batch_fetcher::fetch_all_details(client, &time_zones, rate_limit, buffer_secs).await;
    outcome.details_fetched = batch.details.len();

    for detail_error in &batch.errors {
        db_import::log_error(&mut tx, detail_error).await?;
    }
    outcome.errors_logged += batch.errors.len();

    outcome.details_merged =
        db_import::merge_zone_details(&mut tx, &batch.details, import_time).await?;

    tx.commit().await?;

    info!(
        zones = outcome.zones_listed,
        details = outcome.details_fetched,
        merged = outcome.details_merged,
        errors = outcome.errors_logged,
        "Import run complete"
    );

    Ok(outcome)
}
