//! Homecare route optimizer
//!
//! Geocodes a list of visit addresses, asks a routing service for an
//! ordered route, and reconciles the answer into a display-ready itinerary.
//! Routing, geocoding and travel times all come from external services; the
//! crate orchestrates them behind swappable backends.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod haversine;
pub mod itinerary;
pub mod mapbox;
pub mod nominatim;
pub mod opencage;
pub mod openrouteservice;
pub mod polyline;
pub mod route;
pub mod traffic;
pub mod traits;
pub mod workflow;

pub use config::{DynRouteOptimizer, GeocoderConfig, OptimizerConfig, RouterConfig};
pub use coordinate::Coordinate;
pub use error::{ConfigError, ErrorKind, Failure, OptimizeError};
pub use itinerary::{ItineraryItem, PublishedRoute, RouteSummary, StopEntry, StopKind};
pub use route::{RouteMode, RouteOptions, RouteRequest, RouteResult};
pub use traits::{Geocoder, RouteProvider, TrafficModel};
pub use workflow::{GeocodeMode, RouteOptimizer, RunState};
