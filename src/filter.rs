// src/filter.rs
//
// Request-side predicates over an aggregated alert list. Both are pure,
// independent, and commute; the HTTP layer applies whichever the query
// string asked for.

use crate::alert::{Alert, Severity};

/// Keep alerts whose `areas` list contains `region` exactly.
///
/// Matching is case-sensitive and whole-string; no substring or fuzzy
/// matching against the source-native area names.
pub fn by_region(mut alerts: Vec<Alert>, region: &str) -> Vec<Alert> {
    alerts.retain(|a| a.areas.iter().any(|area| area == region));
    alerts
}

/// Keep alerts at or above `min` on the canonical scale (inclusive).
pub fn by_min_severity(mut alerts: Vec<Alert>, min: Severity) -> Vec<Alert> {
    alerts.retain(|a| a.severity >= min);
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Source;
    use chrono::{TimeZone, Utc};

    fn alert(id: &str, areas: &[&str], severity: Severity) -> Alert {
        Alert {
            source: Source::Smhi,
            id: id.into(),
            headline: "Vind".into(),
            description: None,
            areas: areas.iter().map(|s| s.to_string()).collect(),
            severity,
            published_at: Utc.with_ymd_and_hms(2025, 11, 3, 6, 0, 0).unwrap(),
            url: String::new(),
        }
    }

    #[test]
    fn region_match_is_exact() {
        let alerts = vec![
            alert("a", &["Stockholms län"], Severity::Low),
            alert("b", &["Stockholm"], Severity::Low),
            alert("c", &[], Severity::Low),
        ];
        let out = by_region(alerts, "Stockholms län");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn severity_threshold_is_inclusive() {
        let alerts = vec![
            alert("a", &[], Severity::Info),
            alert("b", &[], Severity::Medium),
            alert("c", &[], Severity::High),
        ];
        let out = by_min_severity(alerts, Severity::Medium);
        assert_eq!(
            out.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
    }

    #[test]
    fn filters_commute() {
        let alerts = vec![
            alert("a", &["Uppsala län"], Severity::High),
            alert("b", &["Uppsala län"], Severity::Info),
            alert("c", &["Gotlands län"], Severity::High),
        ];

        let region_first = by_min_severity(
            by_region(alerts.clone(), "Uppsala län"),
            Severity::Medium,
        );
        let severity_first = by_region(
            by_min_severity(alerts, Severity::Medium),
            "Uppsala län",
        );
        assert_eq!(region_first, severity_first);
        assert_eq!(region_first.len(), 1);
        assert_eq!(region_first[0].id, "a");
    }
}
