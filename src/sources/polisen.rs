// src/sources/polisen.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use reqwest::Client;
use serde_json::Value;

use super::{first_string, first_time, get_json, EventFeed};
use crate::error::SourceError;

const ENDPOINT: &str = "polisen";
const BASE_URL: &str = "https://polisen.se";

/// One incident from the polisen.se events API, normalized.
///
/// Owned by this adapter; it leaves the core only via the mapping into the
/// canonical alert shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PolisenEvent {
    pub id: String,
    pub title: String,
    pub event_type: String,
    pub summary: String,
    pub url: String,
    pub occurred_at: DateTime<Utc>,
    pub location: EventLocation,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLocation {
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub struct PolisenAdapter {
    client: Client,
    url: String,
}

impl PolisenAdapter {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Parse an events payload. The body must be a JSON array; each element
    /// is normalized field by field with these candidate keys, in order:
    ///
    /// - id: `id`
    /// - title: `name`, `title`, `headline`
    /// - type: `type`, `eventType`
    /// - summary: `summary`, `description`
    /// - occurred at: `datetime`, `occurredAt`, `occurred_at`, `date`
    /// - url: `url`, `link`
    /// - location name: `location.name`, `area`
    /// - coordinates: `location.gps` (combined "lat, lon" string)
    pub fn parse_events(body: &Value) -> Result<Vec<PolisenEvent>, SourceError> {
        let list = body
            .as_array()
            .ok_or_else(|| SourceError::malformed(ENDPOINT, "expected a JSON array of events"))?;

        let events: Vec<PolisenEvent> = list.iter().map(Self::parse_event).collect();
        counter!("source_records_total").increment(events.len() as u64);
        Ok(events)
    }

    fn parse_event(raw: &Value) -> PolisenEvent {
        let id = first_string(raw, &["id"]).unwrap_or_default();
        let (lat, lon) = split_gps(first_string(raw, &["location.gps"]).as_deref());

        let url = match first_string(raw, &["url", "link"]) {
            // polisen.se hands out site-relative links
            Some(u) if u.starts_with('/') => format!("{BASE_URL}{u}"),
            Some(u) => u,
            None => format!("{BASE_URL}/aktuellt/handelser/?id={id}"),
        };

        PolisenEvent {
            title: first_string(raw, &["name", "title", "headline"]).unwrap_or_default(),
            event_type: first_string(raw, &["type", "eventType"]).unwrap_or_default(),
            summary: first_string(raw, &["summary", "description"]).unwrap_or_default(),
            occurred_at: first_time(raw, &["datetime", "occurredAt", "occurred_at", "date"])
                .unwrap_or_else(Utc::now),
            location: EventLocation {
                name: first_string(raw, &["location.name", "area"]).unwrap_or_default(),
                lat,
                lon,
            },
            id,
            url,
        }
    }
}

#[async_trait]
impl EventFeed for PolisenAdapter {
    async fn fetch(&self) -> Result<Vec<PolisenEvent>, SourceError> {
        let body = get_json(ENDPOINT, self.client.get(&self.url)).await?;
        Self::parse_events(&body)
    }
}

/// Split a combined `"lat, lon"` string into numeric coordinates.
///
/// Absent input, or anything non-numeric after split-and-trim, yields
/// `(None, None)`, never an error.
fn split_gps(gps: Option<&str>) -> (Option<f64>, Option<f64>) {
    let Some(gps) = gps else {
        return (None, None);
    };
    let mut parts = gps.split(',');
    let lat: Option<f64> = parts.next().map(str::trim).and_then(|s| s.parse().ok());
    let lon: Option<f64> = parts.next().map(str::trim).and_then(|s| s.parse().ok());
    match (lat, lon) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gps_splits_into_coordinates() {
        assert_eq!(split_gps(Some("59.33, 18.06")), (Some(59.33), Some(18.06)));
        assert_eq!(split_gps(Some("59.329323,18.068581")), (Some(59.329323), Some(18.068581)));
    }

    #[test]
    fn gps_absent_or_garbage_yields_none_pair() {
        assert_eq!(split_gps(None), (None, None));
        assert_eq!(split_gps(Some("okänd")), (None, None));
        assert_eq!(split_gps(Some("59.33")), (None, None));
        assert_eq!(split_gps(Some("59.33, norrut")), (None, None));
    }

    #[test]
    fn relative_url_is_prefixed_and_missing_url_is_constructed() {
        let with_relative = PolisenAdapter::parse_event(&json!({
            "id": 512345,
            "name": "Trafikolycka, Stockholm",
            "url": "/aktuellt/handelser/2025/november/trafikolycka/"
        }));
        assert_eq!(
            with_relative.url,
            "https://polisen.se/aktuellt/handelser/2025/november/trafikolycka/"
        );

        let without = PolisenAdapter::parse_event(&json!({ "id": 512346 }));
        assert_eq!(without.url, "https://polisen.se/aktuellt/handelser/?id=512346");
    }

    #[test]
    fn missing_optional_fields_never_fail() {
        let event = PolisenAdapter::parse_event(&json!({}));
        assert_eq!(event.id, "");
        assert_eq!(event.title, "");
        assert_eq!(event.summary, "");
        assert_eq!(event.location.name, "");
        assert_eq!((event.location.lat, event.location.lon), (None, None));
    }

    #[test]
    fn non_array_body_is_malformed() {
        let err = PolisenAdapter::parse_events(&json!({ "message": "nope" })).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }
}
