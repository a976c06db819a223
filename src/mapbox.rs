//! Mapbox Optimized Trips HTTP adapter.
//!
//! The service reorders stops. The visiting order comes back as one
//! `waypoint_index` per returned waypoint, which is mapped back onto the
//! request's coordinate list.
//!
//! The indices are read in the order the waypoints are returned, and each
//! one names the input coordinate visited at that step: `[2, 0, 1]` over
//! stops A, B, C visits C, A, B. This is not the inverse reading where each
//! input waypoint carries its own position in the trip. The two only differ
//! for cyclic reorderings. Switching readings changes every published
//! itinerary, so keep this one unless the callers change with it.

use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;
use crate::polyline::Polyline;
use crate::route::{RouteMode, RouteRequest, RouteResult, check_permutation};
use crate::traits::RouteProvider;

const SERVICE: &str = "mapbox";

/// Optimized Trips v1 accepts at most this many coordinates per request.
pub const MAX_COORDINATES: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapboxConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub access_token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl MapboxConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            access_token: access_token.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone)]
pub struct MapboxClient {
    config: MapboxConfig,
    client: reqwest::blocking::Client,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for MapboxClient {
    fn request_route(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError> {
        if request.options.mode == RouteMode::Matrix {
            return Err(OptimizeError::routing(
                SERVICE,
                "matrix mode is not supported, use directions",
            ));
        }
        if request.coordinates.len() < 2 {
            return Ok(RouteResult::stationary(&request.coordinates));
        }
        if request.coordinates.len() > MAX_COORDINATES {
            return Err(OptimizeError::routing(
                SERVICE,
                format!("a trip supports at most {} locations", MAX_COORDINATES),
            ));
        }

        let coords = request
            .coordinates
            .iter()
            .map(|coord| format!("{:.6},{:.6}", coord.lng(), coord.lat()))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!(
            "{}/optimized-trips/v1/mapbox/{}/{}",
            self.config.base_url,
            request.options.profile.mapbox(),
            coords
        );
        let source = if request.fixed_start { "first" } else { "any" };
        tracing::debug!(service = SERVICE, %url, source, "requesting optimized trip");

        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", self.config.access_token.as_str()),
                ("geometries", "geojson"),
                ("overview", "full"),
                ("source", source),
            ])
            .send()
            .map_err(OptimizeError::transport(SERVICE))?;

        let status = response.status();
        let text = response.text().map_err(OptimizeError::transport(SERVICE))?;
        let body = serde_json::from_str::<TripsResponse>(&text);

        if !status.is_success() {
            let message = body
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP status {}", status));
            return Err(OptimizeError::routing(SERVICE, message));
        }

        let body = body.map_err(|err| OptimizeError::decode(SERVICE, err.to_string()))?;
        trip_result(body, request.coordinates.len())
    }
}

fn trip_result(body: TripsResponse, stops: usize) -> Result<RouteResult, OptimizeError> {
    if body.code.as_deref() != Some("Ok") {
        let message = body
            .message
            .or(body.code)
            .unwrap_or_else(|| "trip request failed".to_string());
        return Err(OptimizeError::routing(SERVICE, message));
    }

    let stop_order = body
        .waypoints
        .iter()
        .map(|waypoint| waypoint.waypoint_index)
        .collect::<Vec<_>>();
    check_permutation(SERVICE, &stop_order, stops)?;

    let trip = body
        .trips
        .into_iter()
        .next()
        .ok_or_else(|| OptimizeError::routing(SERVICE, "response contained no trip"))?;
    let geometry = Polyline::from_positions(&trip.geometry.coordinates)
        .ok_or_else(|| OptimizeError::decode(SERVICE, "trip geometry has an invalid position"))?;

    Ok(RouteResult::from_meters_seconds(
        stop_order,
        geometry,
        trip.distance,
        trip.duration,
    ))
}

#[derive(Debug, Deserialize)]
struct TripsResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    waypoints: Vec<Waypoint>,
    #[serde(default)]
    trips: Vec<Trip>,
}

#[derive(Debug, Deserialize)]
struct Waypoint {
    waypoint_index: usize,
}

#[derive(Debug, Deserialize)]
struct Trip {
    geometry: Geometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}
