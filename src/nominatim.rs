//! Nominatim (OpenStreetMap) HTTP adapter for geocoding.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::OptimizeError;
use crate::traits::Geocoder;

const SERVICE: &str = "nominatim";

/// Nominatim's usage policy rejects requests without an identifying agent.
pub const DEFAULT_USER_AGENT: &str =
    concat!("homecare-route-optimizer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, OptimizeError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/search", self.config.base_url);
        tracing::debug!(service = SERVICE, address, "geocoding address");

        let places = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())
            .map_err(OptimizeError::transport(SERVICE))?;

        match places.into_iter().next() {
            Some(place) => place.coordinate().map(Some),
            None => Ok(None),
        }
    }
}

/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn coordinate(&self) -> Result<Coordinate, OptimizeError> {
        let lat = self.lat.parse::<f64>().map_err(|_| {
            OptimizeError::decode(SERVICE, format!("latitude {:?} is not a number", self.lat))
        })?;
        let lng = self.lon.parse::<f64>().map_err(|_| {
            OptimizeError::decode(SERVICE, format!("longitude {:?} is not a number", self.lon))
        })?;
        Coordinate::new(lng, lat)
            .ok_or_else(|| OptimizeError::decode(SERVICE, "coordinate is not finite"))
    }
}
