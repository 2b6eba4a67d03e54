// src/sources/scb.rs
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::get_json;
use crate::error::SourceError;

const ENDPOINT: &str = "scb";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionLists {
    pub counties: Vec<Region>,
    pub municipalities: Vec<Region>,
}

/// Region reference data from the SCB PxWeb API.
///
/// Any PxWeb table exposing the `Region` variable works; the configured one
/// carries both county (two-character) and municipality (four-character)
/// codes.
pub struct ScbAdapter {
    client: Client,
    url: String,
}

impl ScbAdapter {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub async fn fetch_region_lists(&self) -> Result<RegionLists, SourceError> {
        let body = get_json(ENDPOINT, self.client.get(&self.url)).await?;
        Self::parse_regions(&body)
    }

    /// Locate the `Region` variable and zip its paired `values`/`valueTexts`
    /// lists. Codes partition by string length alone: two characters for
    /// counties, four for municipalities, anything else dropped. That is a
    /// positional convention of the PxWeb table, not a semantic check.
    pub fn parse_regions(body: &Value) -> Result<RegionLists, SourceError> {
        let variables = body
            .get("variables")
            .and_then(Value::as_array)
            .ok_or_else(|| SourceError::malformed(ENDPOINT, "expected a `variables` list"))?;

        let region_var = variables
            .iter()
            .find(|v| v.get("code").and_then(Value::as_str) == Some("Region"))
            .ok_or_else(|| SourceError::malformed(ENDPOINT, "no `Region` variable in metadata"))?;

        let codes = region_var
            .get("values")
            .and_then(Value::as_array)
            .ok_or_else(|| SourceError::malformed(ENDPOINT, "`Region` has no `values` list"))?;
        let names = region_var
            .get("valueTexts")
            .and_then(Value::as_array)
            .ok_or_else(|| SourceError::malformed(ENDPOINT, "`Region` has no `valueTexts` list"))?;

        let mut lists = RegionLists::default();
        for (code, name) in codes.iter().zip(names) {
            let (Some(code), Some(name)) = (code.as_str(), name.as_str()) else {
                continue;
            };
            let region = Region {
                code: code.to_string(),
                name: name.to_string(),
            };
            match code.len() {
                2 => lists.counties.push(region),
                4 => lists.municipalities.push(region),
                _ => {}
            }
        }
        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn regions_partition_by_code_length() {
        let body = json!({
            "title": "Befolkning efter region",
            "variables": [
                { "code": "Tid", "values": ["2024"], "valueTexts": ["2024"] },
                {
                    "code": "Region",
                    "values": ["00", "01", "0114", "03", "1280"],
                    "valueTexts": ["Riket", "Stockholms län", "Upplands Väsby", "Uppsala län", "Malmö"]
                }
            ]
        });

        let lists = ScbAdapter::parse_regions(&body).unwrap();
        assert_eq!(
            lists.counties.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
            vec!["00", "01", "03"]
        );
        assert_eq!(
            lists
                .municipalities
                .iter()
                .map(|r| (r.code.as_str(), r.name.as_str()))
                .collect::<Vec<_>>(),
            vec![("0114", "Upplands Väsby"), ("1280", "Malmö")]
        );
    }

    #[test]
    fn missing_region_variable_is_malformed() {
        let body = json!({ "variables": [ { "code": "Tid", "values": [], "valueTexts": [] } ] });
        let err = ScbAdapter::parse_regions(&body).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }
}
