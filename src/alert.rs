// src/alert.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream provider an alert originated from.
///
/// `(source, id)` identifies an alert; ids are only unique within one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Polisen,
    Smhi,
    Krisinformation,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Polisen, Source::Smhi, Source::Krisinformation];
}

/// Canonical severity scale, increasing urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl Severity {
    /// Map a native SMHI warning level onto the canonical scale.
    ///
    /// Total over all inputs: anything outside {red, orange, yellow},
    /// including the empty string and the "message" pseudo-level, maps to
    /// `Info`.
    pub fn from_level(level: &str) -> Self {
        match level {
            "red" => Severity::High,
            "orange" => Severity::Medium,
            "yellow" => Severity::Low,
            _ => Severity::Info,
        }
    }
}

/// One normalized alert, the unified shape every source is mapped into.
///
/// Records are transient and request-scoped; nothing is cached or persisted.
/// `description` is omitted from the serialized form when absent rather than
/// emitted as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub source: Source,
    pub id: String,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub areas: Vec<String>,
    pub severity: Severity,
    pub published_at: DateTime<Utc>,
    pub url: String,
}
