// src/sources/lansstyrelsen.rs
use reqwest::Client;
use serde_json::Value;

use super::get_json;
use crate::error::SourceError;

const ENDPOINT: &str = "lansstyrelsen";

/// GeoJSON polygon boundaries from the Länsstyrelsen ArcGIS services.
///
/// Plain pass-through fetches; the payloads go to the map frontend untouched.
/// Included for the shared adapter contract, not for any normalization.
pub struct LansstyrelsenAdapter {
    client: Client,
    municipalities_url: String,
    counties_url: String,
}

impl LansstyrelsenAdapter {
    pub fn new(
        client: Client,
        municipalities_url: impl Into<String>,
        counties_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            municipalities_url: municipalities_url.into(),
            counties_url: counties_url.into(),
        }
    }

    /// GeoJSON polygons for all municipalities.
    pub async fn fetch_municipality_polygons(&self) -> Result<Value, SourceError> {
        get_json(ENDPOINT, self.client.get(&self.municipalities_url)).await
    }

    /// GeoJSON polygons for all counties.
    pub async fn fetch_county_polygons(&self) -> Result<Value, SourceError> {
        get_json(ENDPOINT, self.client.get(&self.counties_url)).await
    }
}
