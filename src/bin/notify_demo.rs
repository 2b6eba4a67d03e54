//! Demo that pushes a few sample alerts through the multiplexer (stdout/log
//! only when no channel is configured).

use chrono::Utc;
use larmkartan::{Alert, AlertNotification, NotifierMux, Severity, Source};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();
    let mux = NotifierMux::from_env();

    let samples = [
        Alert {
            source: Source::Smhi,
            id: "40123-7001".into(),
            headline: "Vind".into(),
            description: Some("Mycket hårda vindbyar i östra Svealand.".into()),
            areas: vec!["Stockholms län".into()],
            severity: Severity::Medium,
            published_at: Utc::now(),
            url: String::new(),
        },
        Alert {
            source: Source::Krisinformation,
            id: "20034".into(),
            headline: "Viktigt meddelande: Brand i industribyggnad".into(),
            description: Some("Gå inomhus och stäng dörrar och fönster.".into()),
            areas: vec!["Södermanlands län".into()],
            severity: Severity::Info,
            published_at: Utc::now(),
            url: "https://www.krisinformation.se/nyheter/2025/november/vma-eskilstuna".into(),
        },
    ];

    for alert in &samples {
        mux.notify(&AlertNotification::from_alert(alert)).await;
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    }

    println!("notify-demo done");
}
