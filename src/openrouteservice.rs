//! OpenRouteService HTTP adapter for directions and distance matrices.
//!
//! Neither endpoint reorders stops: results always follow the request
//! order. Directions mode yields a drawable geometry; matrix mode only
//! yields pairwise totals, so its geometry is the stop sequence itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;
use crate::polyline::Polyline;
use crate::route::{Metric, RouteMode, RouteRequest, RouteResult};
use crate::traits::RouteProvider;

const SERVICE: &str = "openrouteservice";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenRouteServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OpenRouteServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openrouteservice.org".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone)]
pub struct OpenRouteServiceClient {
    config: OpenRouteServiceConfig,
    client: reqwest::blocking::Client,
}

impl OpenRouteServiceClient {
    pub fn new(config: OpenRouteServiceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn post<B, T>(&self, url: String, body: &B) -> Result<T, OptimizeError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        tracing::debug!(service = SERVICE, %url, "requesting route");

        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key)
            .json(body)
            .send()
            .map_err(OptimizeError::transport(SERVICE))?;

        let status = response.status();
        let text = response.text().map_err(OptimizeError::transport(SERVICE))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .map(OrsError::into_message)
                .unwrap_or_else(|| format!("HTTP status {}", status));
            return Err(OptimizeError::routing(SERVICE, message));
        }

        serde_json::from_str(&text).map_err(|err| OptimizeError::decode(SERVICE, err.to_string()))
    }

    fn directions(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError> {
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.config.base_url,
            request.options.profile.openrouteservice()
        );
        let body = DirectionsRequest {
            coordinates: request.locations(),
            instructions: false,
        };
        let response: DirectionsResponse = self.post(url, &body)?;
        directions_result(response, request.coordinates.len())
    }

    fn matrix(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError> {
        let url = format!(
            "{}/v2/matrix/{}",
            self.config.base_url,
            request.options.profile.openrouteservice()
        );
        let body = MatrixRequest {
            locations: request.locations(),
            metrics: &request.options.metrics,
            units: request.options.units.as_str(),
        };
        let response: MatrixResponse = self.post(url, &body)?;
        matrix_result(response, request)
    }
}

impl RouteProvider for OpenRouteServiceClient {
    fn request_route(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError> {
        if request.coordinates.len() < 2 {
            return Ok(RouteResult::stationary(&request.coordinates));
        }
        match request.options.mode {
            RouteMode::Directions => self.directions(request),
            RouteMode::Matrix => self.matrix(request),
        }
    }
}

fn directions_result(
    response: DirectionsResponse,
    stops: usize,
) -> Result<RouteResult, OptimizeError> {
    if let Some(error) = response.error {
        return Err(OptimizeError::routing(SERVICE, error.into_message()));
    }
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| OptimizeError::routing(SERVICE, "response contained no route"))?;

    let geometry = Polyline::from_positions(&feature.geometry.coordinates)
        .ok_or_else(|| OptimizeError::decode(SERVICE, "route geometry has an invalid position"))?;

    let properties = feature.properties;
    let (meters, seconds) = if properties.segments.is_empty() {
        properties
            .summary
            .map(|summary| (summary.distance, summary.duration))
            .unwrap_or_default()
    } else {
        properties
            .segments
            .iter()
            .fold((0.0, 0.0), |(m, s), seg| (m + seg.distance, s + seg.duration))
    };

    Ok(RouteResult::from_meters_seconds(
        (0..stops).collect(),
        geometry,
        meters,
        seconds,
    ))
}

fn matrix_result(
    response: MatrixResponse,
    request: &RouteRequest,
) -> Result<RouteResult, OptimizeError> {
    if response.distances.is_none() && response.durations.is_none() {
        let message = response
            .error
            .map(OrsError::into_message)
            .unwrap_or_else(|| "response contained no matrix".to_string());
        return Err(OptimizeError::routing(SERVICE, message));
    }

    let n = request.coordinates.len();
    let metrics = &request.options.metrics;
    let distance = match (&response.distances, metrics.contains(&Metric::Distance)) {
        (Some(matrix), true) => request.options.units.to_km(sum_along_order(matrix, n)?),
        _ => 0.0,
    };
    let seconds = match (&response.durations, metrics.contains(&Metric::Duration)) {
        (Some(matrix), true) => sum_along_order(matrix, n)?,
        _ => 0.0,
    };

    Ok(RouteResult::from_km_minutes(
        (0..n).collect(),
        Polyline::new(request.coordinates.clone()),
        distance,
        seconds / 60.0,
    ))
}

/// Sums the `i -> i + 1` legs of a matrix in request order.
fn sum_along_order(matrix: &[Vec<Option<f64>>], n: usize) -> Result<f64, OptimizeError> {
    let mut total = 0.0;
    for i in 1..n {
        let leg = matrix
            .get(i - 1)
            .and_then(|row| row.get(i))
            .copied()
            .flatten()
            .ok_or_else(|| {
                OptimizeError::routing(
                    SERVICE,
                    format!("no route between stop {} and stop {}", i - 1, i),
                )
            })?;
        total += leg;
    }
    Ok(total)
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
    instructions: bool,
}

#[derive(Debug, Serialize)]
struct MatrixRequest<'a> {
    locations: Vec<[f64; 2]>,
    metrics: &'a [Metric],
    units: &'static str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<OrsError>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrsError {
    Detailed { message: String },
    Plain(String),
}

impl OrsError {
    fn into_message(self) -> String {
        match self {
            OrsError::Detailed { message } | OrsError::Plain(message) => message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
    error: Option<OrsError>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    segments: Vec<Segment>,
    summary: Option<Segment>,
}

#[derive(Debug, Default, Deserialize)]
struct Segment {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    distances: Option<Vec<Vec<Option<f64>>>>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    error: Option<OrsError>,
}
