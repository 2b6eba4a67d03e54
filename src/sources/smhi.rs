// src/sources/smhi.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use reqwest::Client;
use serde_json::Value;

use super::{first_array, first_string, first_time, get_json, WarningFeed};
use crate::error::SourceError;

const ENDPOINT: &str = "smhi";

/// Level codes that may reach the canonical scale. Everything else is
/// clamped to the lowest valid level before mapping.
const VALID_LEVELS: [&str; 3] = ["yellow", "orange", "red"];

/// Start-of-validity candidates, in resolution order. The list has grown
/// with every SMHI API revision and is part of this adapter's contract.
const START_KEYS: [&str; 6] = [
    "approximateStart",
    "start",
    "validFrom",
    "valid_from",
    "onset",
    "from",
];
const END_KEYS: [&str; 6] = [
    "approximateEnd",
    "end",
    "validTo",
    "valid_to",
    "expires",
    "to",
];

/// One weather warning, flattened to a single affected warning area.
///
/// `level` is already lowercased and validated against {yellow, orange, red}.
#[derive(Debug, Clone, PartialEq)]
pub struct SmhiWarning {
    pub id: String,
    pub event_type: String,
    pub level: String,
    pub description: String,
    pub areas: Vec<String>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub url: String,
}

pub struct SmhiAdapter {
    client: Client,
    url: String,
}

impl SmhiAdapter {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Parse a warnings payload. The body is either a flat JSON array of
    /// warnings or an object wrapping one under `warnings`/`alerts`.
    ///
    /// A warning carrying nested `warningAreas` expands to one record per
    /// area, with composite id `{warningId}-{areaId}` so identity stays
    /// unique; a warning without them is emitted as a single record using
    /// the same candidate keys at the warning level.
    pub fn parse_warnings(body: &Value) -> Result<Vec<SmhiWarning>, SourceError> {
        let list = body
            .as_array()
            .or_else(|| first_array(body, &["warnings", "alerts"]))
            .ok_or_else(|| SourceError::malformed(ENDPOINT, "expected a list of warnings"))?;

        let mut out = Vec::new();
        for warning in list {
            Self::expand_warning(warning, &mut out);
        }
        counter!("source_records_total").increment(out.len() as u64);
        Ok(out)
    }

    fn expand_warning(warning: &Value, out: &mut Vec<SmhiWarning>) {
        let warning_id = first_string(warning, &["id", "identifier"]).unwrap_or_default();
        let event_type =
            first_string(warning, &["event.sv", "event.en", "event", "eventType", "type"])
                .unwrap_or_default();
        let url = first_string(warning, &["url", "link", "web"]).unwrap_or_default();

        let nested = first_array(warning, &["warningAreas"]).filter(|a| !a.is_empty());
        let Some(areas) = nested else {
            out.push(Self::warning_record(
                warning,
                warning_id,
                event_type,
                url,
            ));
            return;
        };

        for (i, area) in areas.iter().enumerate() {
            let area_id = first_string(area, &["id", "areaId"]).unwrap_or_else(|| i.to_string());
            out.push(Self::warning_record(
                area,
                format!("{warning_id}-{area_id}"),
                event_type.clone(),
                url.clone(),
            ));
        }
    }

    /// Build one record from `scope` (a nested warning area, or the warning
    /// itself when the payload is flat). Candidate keys, in order:
    ///
    /// - level: `warningLevel.code`, `warningLevel`, `level`, `severity`
    /// - start: `approximateStart`, `start`, `validFrom`, `valid_from`, `onset`, `from`
    /// - end: `approximateEnd`, `end`, `validTo`, `valid_to`, `expires`, `to`
    /// - description: `descriptions[].text` (sv preferred, en fallback),
    ///   then `eventDescription`, then `description`
    /// - areas: `affectedAreas`/`areas`, each a bilingual entry or plain string
    fn warning_record(scope: &Value, id: String, event_type: String, url: String) -> SmhiWarning {
        let level = normalize_level(first_string(
            scope,
            &["warningLevel.code", "warningLevel", "level", "severity"],
        ));

        SmhiWarning {
            id,
            event_type,
            level,
            description: description_of(scope),
            areas: affected_area_names(scope),
            valid_from: first_time(scope, &START_KEYS).unwrap_or_else(Utc::now),
            valid_to: first_time(scope, &END_KEYS),
            url,
        }
    }
}

#[async_trait]
impl WarningFeed for SmhiAdapter {
    async fn fetch(&self) -> Result<Vec<SmhiWarning>, SourceError> {
        let body = get_json(ENDPOINT, self.client.get(&self.url)).await?;
        Self::parse_warnings(&body)
    }
}

/// Lowercase and validate a native level code. Unrecognized values, the
/// "message" pseudo-level included, are clamped to "yellow" so an invalid
/// level never reaches the canonical scale.
fn normalize_level(raw: Option<String>) -> String {
    let lowered = raw.unwrap_or_default().to_lowercase();
    if VALID_LEVELS.contains(&lowered.as_str()) {
        lowered
    } else {
        "yellow".to_string()
    }
}

fn description_of(scope: &Value) -> String {
    if let Some(entries) = first_array(scope, &["descriptions"]) {
        let texts: Vec<String> = entries
            .iter()
            .filter_map(|d| first_string(d, &["text.sv", "text.en", "text"]))
            .collect();
        if !texts.is_empty() {
            return texts.join(" ");
        }
    }
    first_string(scope, &["eventDescription.sv", "eventDescription.en", "description"])
        .unwrap_or_default()
}

fn affected_area_names(scope: &Value) -> Vec<String> {
    let Some(entries) = first_array(scope, &["affectedAreas", "areas"]) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|a| match a {
            Value::String(s) => Some(s.clone()),
            other => first_string(other, &["sv", "en", "name"]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_levels_clamp_to_yellow() {
        assert_eq!(normalize_level(Some("ORANGE".into())), "orange");
        assert_eq!(normalize_level(Some("Red".into())), "red");
        assert_eq!(normalize_level(Some("MESSAGE".into())), "yellow");
        assert_eq!(normalize_level(Some("lila".into())), "yellow");
        assert_eq!(normalize_level(None), "yellow");
    }

    #[test]
    fn nested_areas_expand_to_one_record_each() {
        let body = json!([{
            "id": 40123,
            "event": { "sv": "Vind", "en": "Wind", "code": "WIND" },
            "warningAreas": [
                {
                    "id": 7001,
                    "approximateStart": "2025-11-03T06:00:00Z",
                    "warningLevel": { "sv": "Orange", "en": "Orange", "code": "ORANGE" },
                    "affectedAreas": [
                        { "id": 10, "sv": "Stockholms län", "en": "Stockholm County" },
                        { "id": 3, "sv": "Uppsala län", "en": "Uppsala County" }
                    ],
                    "descriptions": [
                        { "title": { "sv": "Var" }, "text": { "sv": "Östra Svealand." } }
                    ]
                },
                {
                    "id": 7002,
                    "start": "2025-11-03T08:00:00Z",
                    "warningLevel": { "code": "MESSAGE", "sv": "Meddelande" },
                    "affectedAreas": [ { "id": 9, "sv": "Gotlands län" } ]
                }
            ]
        }]);

        let warnings = SmhiAdapter::parse_warnings(&body).unwrap();
        assert_eq!(warnings.len(), 2);

        assert_eq!(warnings[0].id, "40123-7001");
        assert_eq!(warnings[0].event_type, "Vind");
        assert_eq!(warnings[0].level, "orange");
        assert_eq!(warnings[0].description, "Östra Svealand.");
        assert_eq!(
            warnings[0].areas,
            vec!["Stockholms län".to_string(), "Uppsala län".to_string()]
        );
        assert_eq!(warnings[0].valid_from.to_rfc3339(), "2025-11-03T06:00:00+00:00");

        // The "message" pseudo-level never escapes as-is.
        assert_eq!(warnings[1].id, "40123-7002");
        assert_eq!(warnings[1].level, "yellow");
    }

    #[test]
    fn flat_warnings_are_emitted_directly() {
        let body = json!({ "warnings": [{
            "id": "w-9",
            "eventType": "Kuling",
            "level": "yellow",
            "validFrom": "2025-11-01T12:00:00Z",
            "validTo": "2025-11-02T00:00:00Z",
            "description": "Kuling i Skagerrak.",
            "areas": ["Skagerrak"]
        }]});

        let warnings = SmhiAdapter::parse_warnings(&body).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].id, "w-9");
        assert_eq!(warnings[0].event_type, "Kuling");
        assert_eq!(warnings[0].level, "yellow");
        assert_eq!(warnings[0].areas, vec!["Skagerrak".to_string()]);
        assert!(warnings[0].valid_to.is_some());
    }

    #[test]
    fn non_list_body_is_malformed() {
        let err = SmhiAdapter::parse_warnings(&json!("nope")).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }
}
