//! Database access for tzdb-import

pub mod import;

use crate::error::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the database file (and its parent directory) on first run.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create importer tables if they don't exist
///
/// `timezones` is replaced wholesale every run; `zone_details` is append-only
/// with dedup on (zone_name, zone_start, zone_end); `error_log` is
/// append-only with an auto-populated timestamp.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timezones (
            country_code TEXT NOT NULL,
            country_name TEXT NOT NULL,
            zone_name TEXT NOT NULL,
            gmt_offset INTEGER NOT NULL,
            import_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS zone_details (
            zone_name TEXT NOT NULL,
            zone_start INTEGER NOT NULL,
            zone_end INTEGER NOT NULL,
            country_code TEXT NOT NULL,
            country_name TEXT NOT NULL,
            gmt_offset INTEGER NOT NULL,
            dst INTEGER NOT NULL,
            import_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS error_log (
            error_message TEXT NOT NULL,
            error_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (timezones, zone_details, error_log)");

    Ok(())
}
