use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;

use super::{AlertNotification, Notifier};

/// Push-gateway channel: posts each alert to a webhook that forwards it to
/// mobile subscribers. Disabled (no-op) when no URL is configured.
pub struct WebhookNotifier {
    webhook_url: Option<String>,
    client: Client,
}

impl WebhookNotifier {
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("PUSH_WEBHOOK_URL").ok(),
            client: Client::new(),
        }
    }

    /// Optional builder for tests/tools
    pub fn new(url: String) -> Self {
        Self {
            webhook_url: Some(url),
            client: Client::new(),
        }
    }
}

#[derive(Serialize)]
struct PushMessage<'a> {
    notification: PushNotification<'a>,
    data: PushData<'a>,
}

#[derive(Serialize)]
struct PushNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct PushData<'a> {
    id: &'a str,
    url: &'a str,
    source: crate::alert::Source,
    severity: crate::alert::Severity,
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, note: &AlertNotification) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            tracing::debug!("push disabled (no PUSH_WEBHOOK_URL)");
            return Ok(());
        };

        let message = PushMessage {
            notification: PushNotification {
                title: &note.title,
                body: &note.body,
            },
            data: PushData {
                id: &note.id,
                url: &note.url,
                source: note.source,
                severity: note.severity,
            },
        };

        self.client
            .post(url)
            .json(&message)
            .send()
            .await
            .context("push webhook post")?
            .error_for_status()
            .context("push webhook non-2xx")?;
        Ok(())
    }
}
