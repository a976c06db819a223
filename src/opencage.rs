//! OpenCage HTTP adapter for geocoding.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::OptimizeError;
use crate::traits::Geocoder;

const SERVICE: &str = "opencage";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenCageConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OpenCageConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.opencagedata.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone)]
pub struct OpenCageGeocoder {
    config: OpenCageConfig,
    client: reqwest::blocking::Client,
}

impl OpenCageGeocoder {
    pub fn new(config: OpenCageConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for OpenCageGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, OptimizeError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/geocode/v1/json", self.config.base_url);
        tracing::debug!(service = SERVICE, address, "geocoding address");

        let body = self
            .client
            .get(url)
            .query(&[
                ("q", address),
                ("key", self.config.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OpenCageResponse>())
            .map_err(OptimizeError::transport(SERVICE))?;

        let Some(first) = body.results.into_iter().next() else {
            return Ok(None);
        };

        Coordinate::new(first.geometry.lng, first.geometry.lat)
            .map(Some)
            .ok_or_else(|| OptimizeError::decode(SERVICE, "result geometry is not finite"))
    }
}

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: OpenCageGeometry,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_result_wins() {
        let body: OpenCageResponse = serde_json::from_str(
            r#"{"results": [
                {"geometry": {"lat": 38.71, "lng": -9.14}},
                {"geometry": {"lat": 41.15, "lng": -8.61}}
            ], "status": {"code": 200, "message": "OK"}}"#,
        )
        .unwrap();
        assert_eq!(body.results[0].geometry.lng, -9.14);
    }

    #[test]
    fn test_missing_results_decode_as_empty() {
        let body: OpenCageResponse =
            serde_json::from_str(r#"{"status": {"code": 200, "message": "OK"}}"#).unwrap();
        assert!(body.results.is_empty());
    }

    #[test]
    fn test_blank_address_is_not_sent() {
        let geocoder = OpenCageGeocoder::new(OpenCageConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(geocoder.geocode("   ").unwrap(), None);
    }
}
