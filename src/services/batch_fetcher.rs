//! Rate-limited batch fetch of zone details
//!
//! The remote API meters requests per second, so the loop paces itself:
//! minimum spacing between requests is `1/rate` plus a buffer that absorbs
//! the remote side's rate-tracking granularity. Per-zone failures never
//! abort the batch; every zone is attempted exactly once.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::timezonedb_client::{TimeZoneDbClient, TimeZoneDetail, TimeZoneSummary};

/// Successes and failures of one batch, in input order.
#[derive(Debug, Default)]
pub struct BatchFetchOutcome {
    pub details: Vec<TimeZoneDetail>,
    pub errors: Vec<String>,
}

/// Fetch details for every zone in `time_zones`, issuing no more than
/// `rate_limit` requests per second (inclusive of `buffer_secs`).
pub async fn fetch_all_details(
    client: &TimeZoneDbClient,
    time_zones: &[TimeZoneSummary],
    rate_limit: f64,
    buffer_secs: f64,
) -> BatchFetchOutcome {
    let spacing = Duration::from_secs_f64(1.0 / rate_limit + buffer_secs);

    // A previous run may have just issued a request; start from a clean
    // rate window.
    tokio::time::sleep(spacing).await;

    let total = time_zones.len();
    let mut outcome = BatchFetchOutcome::default();
    let mut request_started = Instant::now();

    for (i, tz) in time_zones.iter().enumerate() {
        match client.get_time_zone(&tz.zone_name).await {
            Ok(detail) => outcome.details.push(detail),
            Err(error) => {
                warn!(zone = %tz.zone_name, error = %error, "Zone detail fetch failed");
                outcome.errors.push(error);
            }
        }

        info!("{}/{} time zones loaded", i + 1, total);

        // Sleep off whatever the request itself did not use up, then reset
        // the baseline for the next iteration.
        let elapsed = request_started.elapsed();
        if elapsed < spacing {
            debug!("Rate limiting: waiting {:?}", spacing - elapsed);
            tokio::time::sleep(spacing - elapsed).await;
        }
        request_started = Instant::now();
    }

    outcome
}
