// src/config.rs
use std::time::Duration;

const DEFAULT_POLISEN_URL: &str = "https://polisen.se/api/events";
const DEFAULT_SMHI_URL: &str =
    "https://opendata-download-warnings.smhi.se/ibww/api/version/1/warning.json";
const DEFAULT_KRISINFO_NEWS_URL: &str = "https://api.krisinformation.se/v3/news";
const DEFAULT_KRISINFO_VMAS_URL: &str = "https://api.krisinformation.se/v3/vmas";
const DEFAULT_SCB_REGIONS_URL: &str = "https://api.scb.se/OV0104/v1/AM/AM0101/Population/";
const DEFAULT_MUNICIPALITY_POLYGONS_URL: &str = "https://ext-geodata.lansstyrelsen.se/arcgis/rest/services/lsb/Kommuner/MapServer/1/query?where=1=1&outFields=KOMMUNNAMN,KOMMUNKOD,LANSKOD&outSR=4326&f=geojson";
const DEFAULT_COUNTY_POLYGONS_URL: &str = "https://ext-geodata.lansstyrelsen.se/arcgis/rest/services/lsb/Lan/MapServer/2/query?where=1=1&outFields=LANSNAMN,LAN_KOD,LANSKOD&outSR=4326&f=geojson";

/// Runtime configuration, resolved from the environment with a default for
/// every knob. The binary loads `.env` before calling `from_env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// `PORT`, bound on all interfaces.
    pub bind_addr: String,
    /// `UPSTREAM_TIMEOUT_SECS`. Total-request backstop for every upstream
    /// call; none of the upstream APIs defines its own deadline.
    pub upstream_timeout: Duration,
    pub polisen_url: String,
    pub smhi_url: String,
    pub krisinfo_news_url: String,
    pub krisinfo_vmas_url: String,
    /// `KRISINFO_COUNTY`, forwarded upstream as a county-code filter.
    pub krisinfo_county: Option<String>,
    pub scb_regions_url: String,
    pub municipality_polygons_url: String,
    pub county_polygons_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_or("PORT", "3000");
        let timeout_secs: u64 = env_or("UPSTREAM_TIMEOUT_SECS", "10")
            .parse()
            .unwrap_or(10);

        Self {
            bind_addr: format!("0.0.0.0:{port}"),
            upstream_timeout: Duration::from_secs(timeout_secs),
            polisen_url: env_or("POLISEN_URL", DEFAULT_POLISEN_URL),
            smhi_url: env_or("SMHI_URL", DEFAULT_SMHI_URL),
            krisinfo_news_url: env_or("KRISINFO_NEWS_URL", DEFAULT_KRISINFO_NEWS_URL),
            krisinfo_vmas_url: env_or("KRISINFO_VMAS_URL", DEFAULT_KRISINFO_VMAS_URL),
            krisinfo_county: std::env::var("KRISINFO_COUNTY")
                .ok()
                .filter(|v| !v.is_empty()),
            scb_regions_url: env_or("SCB_REGIONS_URL", DEFAULT_SCB_REGIONS_URL),
            municipality_polygons_url: env_or(
                "MUNICIPALITY_POLYGONS_URL",
                DEFAULT_MUNICIPALITY_POLYGONS_URL,
            ),
            county_polygons_url: env_or("COUNTY_POLYGONS_URL", DEFAULT_COUNTY_POLYGONS_URL),
        }
    }

    /// One shared client for all upstream calls; the bounded timeout keeps a
    /// silent upstream from hanging an aggregation forever.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.upstream_timeout)
            .build()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
