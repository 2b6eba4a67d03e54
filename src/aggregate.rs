// src/aggregate.rs
//
// Fan-out over the alert-carrying feeds, mapping into the canonical shape,
// one combined list out. All-or-nothing: the first failing feed fails the
// whole aggregation, so callers never see a partial, possibly misleading
// list.

use std::sync::Arc;

use metrics::counter;

use crate::alert::{Alert, Severity, Source};
use crate::error::SourceError;
use crate::sources::krisinformation::CrisisItem;
use crate::sources::polisen::PolisenEvent;
use crate::sources::smhi::SmhiWarning;
use crate::sources::{CrisisFeed, EventFeed, WarningFeed};

pub struct Aggregator {
    events: Arc<dyn EventFeed>,
    warnings: Arc<dyn WarningFeed>,
    crisis: Arc<dyn CrisisFeed>,
}

impl Aggregator {
    pub fn new(
        events: Arc<dyn EventFeed>,
        warnings: Arc<dyn WarningFeed>,
        crisis: Arc<dyn CrisisFeed>,
    ) -> Self {
        Self {
            events,
            warnings,
            crisis,
        }
    }

    /// Fetch from every source and return one combined list, most recent
    /// first.
    pub async fn fetch_all(&self) -> Result<Vec<Alert>, SourceError> {
        self.fetch_selected(&Source::ALL).await
    }

    /// Aggregate a subset of sources; a feed outside the selection is not
    /// called and contributes nothing.
    ///
    /// The selected feeds run concurrently with join-all semantics. Results
    /// concatenate in fixed source order (polisen, smhi, krisinformation),
    /// then a stable sort by `published_at` descending, so alerts published
    /// at the same instant keep that source order.
    pub async fn fetch_selected(&self, sources: &[Source]) -> Result<Vec<Alert>, SourceError> {
        let want = |s: Source| sources.contains(&s);

        let (events, warnings, crisis) = tokio::try_join!(
            async {
                if want(Source::Polisen) {
                    self.events.fetch().await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if want(Source::Smhi) {
                    self.warnings.fetch().await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if want(Source::Krisinformation) {
                    self.crisis.fetch().await
                } else {
                    Ok(Vec::new())
                }
            },
        )?;

        let mut alerts: Vec<Alert> =
            Vec::with_capacity(events.len() + warnings.len() + crisis.len());
        alerts.extend(events.into_iter().map(alert_from_event));
        alerts.extend(warnings.into_iter().map(alert_from_warning));
        alerts.extend(crisis.into_iter().map(alert_from_crisis));

        alerts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        counter!("alerts_aggregated_total").increment(alerts.len() as u64);
        Ok(alerts)
    }
}

fn alert_from_event(e: PolisenEvent) -> Alert {
    Alert {
        source: Source::Polisen,
        id: e.id,
        headline: e.title,
        description: non_empty(e.summary),
        areas: if e.location.name.is_empty() {
            Vec::new()
        } else {
            vec![e.location.name]
        },
        // polisen carries no native level
        severity: Severity::Info,
        published_at: e.occurred_at,
        url: e.url,
    }
}

fn alert_from_warning(w: SmhiWarning) -> Alert {
    Alert {
        source: Source::Smhi,
        id: w.id,
        headline: w.event_type,
        description: non_empty(w.description),
        areas: w.areas,
        severity: Severity::from_level(&w.level),
        published_at: w.valid_from,
        url: w.url,
    }
}

fn alert_from_crisis(k: CrisisItem) -> Alert {
    Alert {
        source: Source::Krisinformation,
        id: k.id,
        headline: k.headline,
        description: non_empty(k.preamble),
        areas: k.counties,
        // krisinformation items carry no native level either
        severity: Severity::Info,
        published_at: k.published_at,
        url: k.url,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::polisen::EventLocation;
    use chrono::{TimeZone, Utc};

    #[test]
    fn event_mapping_keeps_info_severity_and_drops_empty_fields() {
        let alert = alert_from_event(PolisenEvent {
            id: "512345".into(),
            title: "Trafikolycka, Stockholm".into(),
            event_type: "Trafikolycka".into(),
            summary: String::new(),
            url: "https://polisen.se/x".into(),
            occurred_at: Utc.with_ymd_and_hms(2025, 11, 2, 17, 32, 11).unwrap(),
            location: EventLocation::default(),
        });
        assert_eq!(alert.source, Source::Polisen);
        assert_eq!(alert.severity, Severity::Info);
        assert_eq!(alert.description, None);
        assert!(alert.areas.is_empty());
    }

    #[test]
    fn warning_mapping_goes_through_the_level_table() {
        let alert = alert_from_warning(SmhiWarning {
            id: "40123-7001".into(),
            event_type: "Vind".into(),
            level: "orange".into(),
            description: "Mycket hårda vindbyar.".into(),
            areas: vec!["Stockholms län".into()],
            valid_from: Utc.with_ymd_and_hms(2025, 11, 3, 6, 0, 0).unwrap(),
            valid_to: None,
            url: String::new(),
        });
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.headline, "Vind");
        assert_eq!(alert.areas, vec!["Stockholms län".to_string()]);
    }
}
