//! Larmkartan — Binary Entrypoint
//! Boots the Axum HTTP server, wiring upstream adapters, routes, and middleware.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use larmkartan::api::{self, AppState};
use larmkartan::config::Config;
use larmkartan::metrics::Metrics;
use larmkartan::sources::krisinformation::KrisinformationAdapter;
use larmkartan::sources::lansstyrelsen::LansstyrelsenAdapter;
use larmkartan::sources::polisen::PolisenAdapter;
use larmkartan::sources::scb::ScbAdapter;
use larmkartan::sources::smhi::SmhiAdapter;
use larmkartan::Aggregator;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("larmkartan=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = Config::from_env();
    let client = cfg.http_client().context("building upstream http client")?;

    let aggregator = Aggregator::new(
        Arc::new(PolisenAdapter::new(client.clone(), &cfg.polisen_url)),
        Arc::new(SmhiAdapter::new(client.clone(), &cfg.smhi_url)),
        Arc::new(
            KrisinformationAdapter::new(
                client.clone(),
                &cfg.krisinfo_news_url,
                &cfg.krisinfo_vmas_url,
            )
            .with_county(cfg.krisinfo_county.clone()),
        ),
    );

    let state = AppState {
        aggregator: Arc::new(aggregator),
        regions: Arc::new(ScbAdapter::new(client.clone(), &cfg.scb_regions_url)),
        geo: Arc::new(LansstyrelsenAdapter::new(
            client,
            &cfg.municipality_polygons_url,
            &cfg.county_polygons_url,
        )),
    };

    // Install the recorder before any adapter records a series.
    let metrics = Metrics::init();
    let app = api::router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    tracing::info!(addr = %cfg.bind_addr, "listening");

    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
