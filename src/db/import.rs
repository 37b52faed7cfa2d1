//! Import persistence operations
//!
//! Three named writes: append to the error log, wholesale replacement of the
//! zone summary table, and the staged anti-join merge into zone_details.
//! All run on the caller's open connection or transaction; a run commits
//! once at the end.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::error::Result;
use crate::services::timezonedb_client::{TimeZoneDetail, TimeZoneSummary};

/// Append one recoverable failure to the error log. The error_date column
/// fills itself.
pub async fn log_error(conn: &mut SqliteConnection, message: &str) -> Result<()> {
    sqlx::query("INSERT INTO error_log (error_message) VALUES (?)")
        .bind(message)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Replace the timezones table with this run's list, every row stamped with
/// the run's import timestamp.
pub async fn replace_time_zones(
    conn: &mut SqliteConnection,
    time_zones: &[TimeZoneSummary],
    import_time: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("DELETE FROM timezones")
        .execute(&mut *conn)
        .await?;

    let import_date = import_time.to_rfc3339();
    for tz in time_zones {
        sqlx::query(
            r#"
            INSERT INTO timezones (country_code, country_name, zone_name, gmt_offset, import_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tz.country_code)
        .bind(&tz.country_name)
        .bind(&tz.zone_name)
        .bind(tz.gmt_offset)
        .bind(&import_date)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Merge details into zone_details, skipping rows whose
/// (zone_name, zone_start, zone_end) triple is already present.
///
/// Incoming rows are staged in a temporary table and copied over in one
/// anti-join insert rather than checked for existence row by row. Returns
/// the number of rows actually inserted.
pub async fn merge_zone_details(
    conn: &mut SqliteConnection,
    details: &[TimeZoneDetail],
    import_time: DateTime<Utc>,
) -> Result<u64> {
    sqlx::query("CREATE TEMPORARY TABLE staged_zone_details AS SELECT * FROM zone_details WHERE 0")
        .execute(&mut *conn)
        .await?;

    let import_date = import_time.to_rfc3339();
    for detail in details {
        sqlx::query(
            r#"
            INSERT INTO staged_zone_details
                (zone_name, zone_start, zone_end, country_code, country_name,
                 gmt_offset, dst, import_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&detail.zone_name)
        .bind(detail.zone_start)
        .bind(detail.zone_end)
        .bind(&detail.country_code)
        .bind(&detail.country_name)
        .bind(detail.gmt_offset)
        .bind(detail.dst)
        .bind(&import_date)
        .execute(&mut *conn)
        .await?;
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO zone_details
            (zone_name, zone_start, zone_end, country_code, country_name,
             gmt_offset, dst, import_date)
        SELECT s.zone_name, s.zone_start, s.zone_end, s.country_code, s.country_name,
               s.gmt_offset, s.dst, s.import_date
        FROM staged_zone_details s
        LEFT JOIN zone_details d
            ON s.zone_name = d.zone_name
            AND s.zone_start = d.zone_start
            AND s.zone_end = d.zone_end
        WHERE d.zone_name IS NULL
        "#,
    )
    .execute(&mut *conn)
    .await?
    .rows_affected();

    // Temp tables live for the connection, not the transaction; drop so the
    // next merge on this connection can stage again.
    sqlx::query("DROP TABLE staged_zone_details")
        .execute(&mut *conn)
        .await?;

    Ok(inserted)
}
