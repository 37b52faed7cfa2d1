//! TimeZoneDB API client
//!
//! Wraps the `/list-time-zone` and `/get-time-zone` endpoints. Transport and
//! parse failures never propagate out of the public calls: every fetch
//! returns `Result<_, String>` with the failure description in the error
//! arm, which the orchestrator records in the error log.

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{Error, Result};

const USER_AGENT: &str = "tzdb-import/0.1.0";
const LIST_FIELDS: &str = "countryCode,countryName,zoneName,gmtOffset,dst";
const DETAIL_FIELDS: &str = "zoneName,zoneStart,zoneEnd,countryCode,countryName,gmtOffset,dst";
const NO_MESSAGE: &str = "No error message in response";

/// Lower bound substituted when the API omits or zeroes zoneStart.
pub const ZONE_START_MIN: i64 = -i64::MAX;

/// Upper bound substituted when the API omits or zeroes zoneEnd.
pub const ZONE_END_MAX: i64 = i64::MAX;

/// One entry of the zone list. `zone_name` is the natural key joining the
/// list with per-zone details.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneSummary {
    pub country_code: String,
    pub country_name: String,
    pub zone_name: String,
    pub gmt_offset: i64,
    #[serde(default)]
    pub dst: bool,
}

/// One offset-validity window for a zone, bounds normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZoneDetail {
    pub zone_name: String,
    /// Window start, epoch seconds. `ZONE_START_MIN` when the API gave none.
    pub zone_start: i64,
    /// Window end, epoch seconds. `ZONE_END_MAX` when the API gave none.
    pub zone_end: i64,
    pub country_code: String,
    pub country_name: String,
    pub gmt_offset: i64,
    pub dst: bool,
}

/// Wire shape of a `/get-time-zone` payload, bounds still optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeZoneDetail {
    zone_name: String,
    #[serde(default)]
    zone_start: Option<i64>,
    #[serde(default)]
    zone_end: Option<i64>,
    country_code: String,
    country_name: String,
    gmt_offset: i64,
    #[serde(default)]
    dst: bool,
}

impl RawTimeZoneDetail {
    /// The API omits (or zeroes) zoneStart/zoneEnd for zones without a known
    /// transition window. The persisted columns are non-nullable, so absent
    /// bounds widen to the full representable range. Explicit non-zero
    /// values pass through untouched.
    fn normalize(self) -> TimeZoneDetail {
        TimeZoneDetail {
            zone_name: self.zone_name,
            zone_start: match self.zone_start {
                Some(v) if v != 0 => v,
                _ => ZONE_START_MIN,
            },
            zone_end: match self.zone_end {
                Some(v) if v != 0 => v,
                _ => ZONE_END_MAX,
            },
            country_code: self.country_code,
            country_name: self.country_name,
            gmt_offset: self.gmt_offset,
            dst: self.dst,
        }
    }
}

/// TimeZoneDB API client
pub struct TimeZoneDbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TimeZoneDbClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// Fetch the full list of known time zones.
    ///
    /// A payload without a `zones` field yields an empty list, not an error.
    pub async fn list_time_zones(&self) -> std::result::Result<Vec<TimeZoneSummary>, String> {
        let url = format!("{}/list-time-zone", self.base_url);
        let params = [
            ("key", self.api_key.as_str()),
            ("format", "json"),
            ("fields", LIST_FIELDS),
        ];

        tracing::debug!(url = %url, "Querying list-time-zone");

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        let payload = extract_payload(response).await?;

        match payload.get("zones") {
            Some(zones) => serde_json::from_value(zones.clone())
                .map_err(|e| format!("Unexpected zone list shape: {e}")),
            None => Ok(Vec::new()),
        }
    }

    /// Look up the offset window for one zone by name.
    pub async fn get_time_zone(
        &self,
        zone_name: &str,
    ) -> std::result::Result<TimeZoneDetail, String> {
        let url = format!("{}/get-time-zone", self.base_url);
        let params = [
            ("key", self.api_key.as_str()),
            ("format", "json"),
            ("by", "zone"),
            ("zone", zone_name),
            ("fields", DETAIL_FIELDS),
        ];

        tracing::debug!(zone = %zone_name, "Querying get-time-zone");

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| format!("Request error for {zone_name}: {e}"))?;

        let payload = extract_payload(response).await?;

        let raw: RawTimeZoneDetail = serde_json::from_value(payload)
            .map_err(|e| format!("Unexpected zone detail shape for {zone_name}: {e}"))?;

        Ok(raw.normalize())
    }
}

/// Decode one API response into its JSON payload, or the failure message.
///
/// The API can return HTTP 200 with an embedded failure (`"status":
/// "FAILED"`), so a call counts as successful only when the transport status
/// and the payload's own status field both agree.
pub async fn extract_payload(response: reqwest::Response) -> std::result::Result<Value, String> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);

    // Non-JSON error bodies (proxies, rate limiters) carry no usable message.
    if !status.is_success() && !is_json {
        return Err(status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string());
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|e| format!("Invalid JSON payload: {e}"))?;

    if status.is_success() && payload.get("status").and_then(Value::as_str) == Some("OK") {
        return Ok(payload);
    }

    Err(payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(NO_MESSAGE)
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(zone_start: Option<i64>, zone_end: Option<i64>) -> RawTimeZoneDetail {
        RawTimeZoneDetail {
            zone_name: "Europe/Andorra".to_string(),
            zone_start,
            zone_end,
            country_code: "AD".to_string(),
            country_name: "Andorra".to_string(),
            gmt_offset: 7200,
            dst: false,
        }
    }

    #[test]
    fn absent_bounds_widen_to_representable_range() {
        let detail = raw(None, None).normalize();
        assert_eq!(detail.zone_start, -9_223_372_036_854_775_807);
        assert_eq!(detail.zone_end, 9_223_372_036_854_775_807);
    }

    #[test]
    fn zero_bounds_widen_to_representable_range() {
        let detail = raw(Some(0), Some(0)).normalize();
        assert_eq!(detail.zone_start, ZONE_START_MIN);
        assert_eq!(detail.zone_end, ZONE_END_MAX);
    }

    #[test]
    fn explicit_bounds_are_preserved() {
        let detail = raw(Some(1_699_164_000), Some(1_710_054_000)).normalize();
        assert_eq!(detail.zone_start, 1_699_164_000);
        assert_eq!(detail.zone_end, 1_710_054_000);
    }

    #[test]
    fn mixed_bounds_substitute_only_the_missing_side() {
        let detail = raw(Some(1_699_164_000), None).normalize();
        assert_eq!(detail.zone_start, 1_699_164_000);
        assert_eq!(detail.zone_end, ZONE_END_MAX);
    }

    #[test]
    fn summary_deserializes_from_api_shape() {
        let summaries: Vec<TimeZoneSummary> = serde_json::from_value(json!([{
            "countryCode": "AD",
            "countryName": "Andorra",
            "zoneName": "Europe/Andorra",
            "gmtOffset": 7200,
            "dst": false
        }]))
        .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].zone_name, "Europe/Andorra");
        assert_eq!(summaries[0].gmt_offset, 7200);
    }
}
