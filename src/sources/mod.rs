// src/sources/mod.rs
pub mod krisinformation;
pub mod lansstyrelsen;
pub mod polisen;
pub mod scb;
pub mod smhi;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::SourceError;
use krisinformation::CrisisItem;
use polisen::PolisenEvent;
use smhi::SmhiWarning;

/// Feed of police incident events, as the aggregator consumes it.
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<PolisenEvent>, SourceError>;
}

/// Feed of weather warnings, one record per affected warning area.
#[async_trait]
pub trait WarningFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SmhiWarning>, SourceError>;
}

/// Feed of crisis-information items (news and VMA messages combined).
#[async_trait]
pub trait CrisisFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CrisisItem>, SourceError>;
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "source_records_total",
            "Records parsed from upstream sources."
        );
        describe_counter!(
            "source_fetch_errors_total",
            "Upstream fetch/status/parse errors."
        );
        describe_histogram!("source_fetch_ms", "Upstream fetch time in milliseconds.");
        describe_counter!(
            "alerts_aggregated_total",
            "Alerts produced by aggregation runs."
        );
    });
}

/// Issue a prepared GET and decode the body as JSON.
///
/// Network failure and non-success status become `SourceError::Upstream` /
/// `SourceError::Status`; a body that is not JSON at all becomes
/// `SourceError::Malformed`. Everything softer than that is left to the
/// caller's field fallbacks.
pub(crate) async fn get_json(
    endpoint: &'static str,
    req: reqwest::RequestBuilder,
) -> Result<Value, SourceError> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let resp = req.send().await.map_err(|e| {
        counter!("source_fetch_errors_total").increment(1);
        SourceError::Upstream {
            endpoint,
            source: e,
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        counter!("source_fetch_errors_total").increment(1);
        return Err(SourceError::Status { endpoint, status });
    }

    let body = resp.json::<Value>().await.map_err(|e| {
        counter!("source_fetch_errors_total").increment(1);
        SourceError::Malformed {
            endpoint,
            reason: e.to_string(),
        }
    })?;

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("source_fetch_ms").record(ms);
    Ok(body)
}

// ---- Defensive field resolution ----
//
// Upstream schemas drift across API versions, so adapters never read a field
// through one fixed key. Each field has an ordered candidate list of
// dot-separated paths; the first present, usable value wins and absence at
// any level of a nested path means "missing", never an error. The candidate
// lists live with the adapters and are part of their contract.

/// Walk a dot-separated path (e.g. `"location.gps"`) into a JSON value.
pub(crate) fn at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = value;
    for key in path.split('.') {
        cur = cur.get(key)?;
    }
    if cur.is_null() {
        None
    } else {
        Some(cur)
    }
}

fn as_string_like(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First candidate path resolving to a string (numbers are stringified,
/// since some upstreams flip ids between the two).
pub(crate) fn first_string(value: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|p| at(value, p).and_then(as_string_like))
}

/// First candidate path resolving to an array.
pub(crate) fn first_array<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Vec<Value>> {
    paths.iter().find_map(|p| at(value, p).and_then(Value::as_array))
}

/// First candidate path resolving to a parseable timestamp.
pub(crate) fn first_time(value: &Value, paths: &[&str]) -> Option<DateTime<Utc>> {
    paths
        .iter()
        .find_map(|p| at(value, p).and_then(Value::as_str).and_then(parse_timestamp))
}

/// Parse an upstream timestamp: RFC 3339 first, then the
/// `"YYYY-MM-DD HH:MM:SS +HH:MM"` form polisen.se uses.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn at_follows_nested_paths_and_treats_null_as_missing() {
        let v = json!({ "location": { "gps": "59.3,18.0", "name": null } });
        assert_eq!(at(&v, "location.gps").and_then(Value::as_str), Some("59.3,18.0"));
        assert!(at(&v, "location.name").is_none());
        assert!(at(&v, "location.missing.deeper").is_none());
    }

    #[test]
    fn first_string_takes_first_usable_candidate() {
        let v = json!({ "title": { "nested": true }, "name": "Trafikolycka", "id": 42 });
        // `title` is present but not string-like, so resolution moves on.
        assert_eq!(
            first_string(&v, &["title", "name"]),
            Some("Trafikolycka".to_string())
        );
        assert_eq!(first_string(&v, &["id"]), Some("42".to_string()));
        assert_eq!(first_string(&v, &["nope", "nada"]), None);
    }

    #[test]
    fn timestamps_parse_both_upstream_forms() {
        let rfc3339 = parse_timestamp("2025-11-03T06:00:00Z").unwrap();
        assert_eq!(rfc3339.to_rfc3339(), "2025-11-03T06:00:00+00:00");

        let polisen = parse_timestamp("2025-11-02 18:32:11 +01:00").unwrap();
        assert_eq!(polisen.to_rfc3339(), "2025-11-02T17:32:11+00:00");

        assert!(parse_timestamp("igår kväll").is_none());
    }
}
