//! Straight-line route provider (fallback when no routing service is configured).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than a road network router, but needs no credentials and
//! makes no network calls. Stops are visited in request order.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::OptimizeError;
use crate::polyline::Polyline;
use crate::route::{RouteRequest, RouteResult};
use crate::traits::RouteProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based route provider.
///
/// Estimates travel time using straight-line distance and an assumed speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaversineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Calculate haversine distance between two points in kilometers.
    pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.lat().to_radians();
        let lat2_rad = to.lat().to_radians();
        let delta_lat = (to.lat() - from.lat()).to_radians();
        let delta_lng = (to.lng() - from.lng()).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in minutes.
    fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }
}

impl RouteProvider for HaversineRouter {
    fn request_route(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError> {
        if !(self.speed_kmh.is_finite() && self.speed_kmh > 0.0) {
            return Err(OptimizeError::routing(
                "straight-line",
                format!("speed must be positive, got {} km/h", self.speed_kmh),
            ));
        }

        let km: f64 = request
            .coordinates
            .windows(2)
            .map(|leg| Self::haversine_km(leg[0], leg[1]))
            .sum();

        tracing::debug!(stops = request.coordinates.len(), km, "estimated straight-line route");

        Ok(RouteResult::from_km_minutes(
            (0..request.coordinates.len()).collect(),
            Polyline::new(request.coordinates.clone()),
            km,
            self.km_to_minutes(km),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{RouteMode, RouteOptions, build_request};

    fn coord(lng: f64, lat: f64) -> Coordinate {
        Coordinate::new(lng, lat).unwrap()
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = HaversineRouter::haversine_km(coord(-115.1, 36.1), coord(-115.1, 36.1));
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Lisbon (38.72, -9.14) to Porto (41.15, -8.61)
        // Actual distance ~274 km
        let dist = HaversineRouter::haversine_km(coord(-9.14, 38.72), coord(-8.61, 41.15));
        assert!(dist > 260.0 && dist < 290.0, "Lisbon to Porto should be ~274km, got {}", dist);
    }

    #[test]
    fn test_reasonable_travel_time() {
        let router = HaversineRouter::new(40.0); // 40 km/h
        // 10 km at 40 km/h = 0.25 hours = 15 minutes
        assert_eq!(router.km_to_minutes(10.0), 15.0);
    }

    #[test]
    fn test_route_keeps_request_order() {
        let coords = vec![coord(-9.14, 38.72), coord(-9.15, 38.73), coord(-9.16, 38.70)];
        for mode in [RouteMode::Directions, RouteMode::Matrix] {
            let options = RouteOptions {
                mode,
                ..RouteOptions::default()
            };
            let result = HaversineRouter::default()
                .request_route(&build_request(&coords, &options, false))
                .unwrap();
            assert_eq!(result.stop_order, vec![0, 1, 2]);
            assert_eq!(result.geometry.points(), coords.as_slice());
            assert!(result.distance_km > 0.0);
        }
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let coords = vec![coord(-9.14, 38.72), coord(-9.15, 38.73)];
        let request = build_request(&coords, &RouteOptions::default(), false);
        assert!(HaversineRouter::new(0.0).request_route(&request).is_err());
    }
}
