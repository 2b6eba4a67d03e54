pub mod webhook;

use crate::alert::{Alert, Severity, Source};

/// Payload pushed to subscribers when an alert is broadcast.
#[derive(Debug, Clone)]
pub struct AlertNotification {
    pub title: String,
    pub body: String,
    pub id: String,
    pub url: String,
    pub source: Source,
    pub severity: Severity,
}

impl AlertNotification {
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            title: alert.headline.clone(),
            body: alert.description.clone().unwrap_or_default(),
            id: alert.id.clone(),
            url: alert.url.clone(),
            source: alert.source,
            severity: alert.severity,
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, note: &AlertNotification) -> anyhow::Result<()>;
}

/// Fan-out to every configured channel. A failing channel is logged and
/// skipped; broadcasting never fails the caller.
pub struct NotifierMux {
    channels: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn from_env() -> Self {
        let channels: Vec<Box<dyn Notifier>> =
            vec![Box::new(webhook::WebhookNotifier::from_env())];
        Self { channels }
    }

    pub fn with_channels(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    pub async fn notify(&self, note: &AlertNotification) {
        for channel in &self.channels {
            if let Err(e) = channel.send(note).await {
                tracing::warn!(error = ?e, alert = %note.id, "notification channel failed");
            }
        }
    }
}
