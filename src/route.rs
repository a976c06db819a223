//! Route requests sent to a routing backend and the normalized results
//! they produce.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, round2};
use crate::error::OptimizeError;
use crate::polyline::Polyline;

/// Which kind of answer to ask the routing service for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Pairwise distances/durations only, no concrete path.
    Matrix,
    /// One concrete path with geometry. Optimizing services may reorder stops.
    #[default]
    Directions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    DrivingCar,
    CyclingRegular,
    FootWalking,
}

impl Profile {
    /// OpenRouteService profile name.
    pub fn openrouteservice(&self) -> &'static str {
        match self {
            Profile::DrivingCar => "driving-car",
            Profile::CyclingRegular => "cycling-regular",
            Profile::FootWalking => "foot-walking",
        }
    }

    /// Mapbox profile name.
    pub fn mapbox(&self) -> &'static str {
        match self {
            Profile::DrivingCar => "driving",
            Profile::CyclingRegular => "cycling",
            Profile::FootWalking => "walking",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Meters,
    #[default]
    Kilometers,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
        }
    }

    pub(crate) fn to_km(self, value: f64) -> f64 {
        match self {
            DistanceUnit::Meters => value / 1000.0,
            DistanceUnit::Kilometers => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Distance,
    Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    pub mode: RouteMode,
    pub profile: Profile,
    /// Unit the matrix service reports distances in.
    pub units: DistanceUnit,
    pub metrics: Vec<Metric>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            mode: RouteMode::default(),
            profile: Profile::default(),
            units: DistanceUnit::default(),
            metrics: vec![Metric::Distance, Metric::Duration],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub coordinates: Vec<Coordinate>,
    pub options: RouteOptions,
    /// Coordinate 0 is a fixed starting point the trip must begin at.
    pub fixed_start: bool,
}

impl RouteRequest {
    pub fn locations(&self) -> Vec<[f64; 2]> {
        self.coordinates.iter().map(|coord| coord.to_position()).collect()
    }
}

/// Assembles the request payload for one optimization attempt.
///
/// Input order is preserved. Backends that optimize treat it as a hint.
pub fn build_request(
    coordinates: &[Coordinate],
    options: &RouteOptions,
    fixed_start: bool,
) -> RouteRequest {
    RouteRequest {
        coordinates: coordinates.to_vec(),
        options: options.clone(),
        fixed_start: fixed_start && !coordinates.is_empty(),
    }
}

/// Normalized routing answer, independent of the backend that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Visiting order as indices into the request's coordinate list.
    pub stop_order: Vec<usize>,
    pub geometry: Polyline,
    pub distance_km: f64,
    /// Duration before any traffic adjustment.
    pub duration_minutes: f64,
}

impl RouteResult {
    /// Builds a result from raw service units (meters and seconds).
    pub fn from_meters_seconds(
        stop_order: Vec<usize>,
        geometry: Polyline,
        meters: f64,
        seconds: f64,
    ) -> Self {
        Self::from_km_minutes(stop_order, geometry, meters / 1000.0, seconds / 60.0)
    }

    pub fn from_km_minutes(
        stop_order: Vec<usize>,
        geometry: Polyline,
        km: f64,
        minutes: f64,
    ) -> Self {
        Self {
            stop_order,
            geometry,
            distance_km: round2(km),
            duration_minutes: round2(minutes),
        }
    }

    /// Result for fewer than two stops, where there is nothing to travel.
    pub fn stationary(coordinates: &[Coordinate]) -> Self {
        Self {
            stop_order: (0..coordinates.len()).collect(),
            geometry: Polyline::new(coordinates.to_vec()),
            distance_km: 0.0,
            duration_minutes: 0.0,
        }
    }
}

/// Checks that `order` visits every index in `0..len` exactly once.
pub(crate) fn check_permutation(
    service: &'static str,
    order: &[usize],
    len: usize,
) -> Result<(), OptimizeError> {
    if order.len() != len {
        return Err(OptimizeError::routing(
            service,
            format!("returned {} stops for {} locations", order.len(), len),
        ));
    }
    let mut seen = vec![false; len];
    for &index in order {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(OptimizeError::routing(
                    service,
                    format!("returned invalid stop index {}", index),
                ));
            }
        }
    }
    Ok(())
}
