//! Collaborator interfaces for the optimization workflow.
//!
//! Each external service sits behind one of these traits. The boxed impls
//! let [`crate::config`] pick backends at runtime.

use crate::coordinate::Coordinate;
use crate::error::OptimizeError;
use crate::route::{RouteRequest, RouteResult};

/// Turns a free-text address into a coordinate.
pub trait Geocoder: Send + Sync {
    /// Returns `Ok(None)` when the service has no match for `address`.
    ///
    /// The first match wins; ambiguous addresses are not disambiguated.
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, OptimizeError>;
}

/// Submits coordinates to a routing/optimization service.
pub trait RouteProvider: Send + Sync {
    fn request_route(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError>;
}

/// Scales a raw travel duration for expected traffic.
pub trait TrafficModel {
    /// Multiplier for a run started during `hour` (0..=23, local time).
    fn multiplier(&self, hour: u32) -> f64;
}

impl<T: Geocoder + ?Sized> Geocoder for Box<T> {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, OptimizeError> {
        (**self).geocode(address)
    }
}

impl<T: RouteProvider + ?Sized> RouteProvider for Box<T> {
    fn request_route(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError> {
        (**self).request_route(request)
    }
}

impl<T: TrafficModel + ?Sized> TrafficModel for Box<T> {
    fn multiplier(&self, hour: u32) -> f64 {
        (**self).multiplier(hour)
    }
}
