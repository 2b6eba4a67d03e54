use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::aggregate::Aggregator;
use crate::alert::{Alert, Severity};
use crate::error::SourceError;
use crate::filter;
use crate::sources::lansstyrelsen::LansstyrelsenAdapter;
use crate::sources::scb::{RegionLists, ScbAdapter};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub regions: Arc<ScbAdapter>,
    pub geo: Arc<LansstyrelsenAdapter>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/alerts", get(alerts))
        .route("/regions", get(regions))
        .route("/geo/municipalities", get(municipality_polygons))
        .route("/geo/counties", get(county_polygons))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct AlertsQuery {
    county: Option<String>,
    severity: Option<Severity>,
}

/// Aggregation failures fail closed: a 502 with an error body, never a
/// silently empty or partial alert list.
struct UpstreamFailure(SourceError);

impl From<SourceError> for UpstreamFailure {
    fn from(e: SourceError) -> Self {
        UpstreamFailure(e)
    }
}

impl IntoResponse for UpstreamFailure {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, upstream = self.0.endpoint(), "upstream fetch failed");
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}

async fn alerts(
    State(state): State<AppState>,
    Query(q): Query<AlertsQuery>,
) -> Result<Json<Vec<Alert>>, UpstreamFailure> {
    let mut alerts = state.aggregator.fetch_all().await?;
    if let Some(county) = &q.county {
        alerts = filter::by_region(alerts, county);
    }
    if let Some(min) = q.severity {
        alerts = filter::by_min_severity(alerts, min);
    }
    Ok(Json(alerts))
}

async fn regions(State(state): State<AppState>) -> Result<Json<RegionLists>, UpstreamFailure> {
    let lists = state.regions.fetch_region_lists().await?;
    Ok(Json(lists))
}

async fn municipality_polygons(
    State(state): State<AppState>,
) -> Result<Json<Value>, UpstreamFailure> {
    let geojson = state.geo.fetch_municipality_polygons().await?;
    Ok(Json(geojson))
}

async fn county_polygons(State(state): State<AppState>) -> Result<Json<Value>, UpstreamFailure> {
    let geojson = state.geo.fetch_county_polygons().await?;
    Ok(Json(geojson))
}
