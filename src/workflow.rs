//! The optimize workflow: validation, geocoding, routing, reconciliation.
//!
//! [`RouteOptimizer`] owns the user's entries and the last published route.
//! Each optimize action recomputes everything from scratch; a failed run
//! leaves the previously published route untouched.
//!
//! Overlapping runs are not supported. The caller is expected to disable
//! its optimize action while a run is in flight.

use chrono::Timelike;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{Failure, OptimizeError};
use crate::itinerary::{
    GeocodedStops, PublishedRoute, RouteSummary, StopEntry, normalize_appointment, reconcile,
};
use crate::route::{RouteOptions, build_request};
use crate::traffic::TimeOfDayTraffic;
use crate::traits::{Geocoder, RouteProvider, TrafficModel};

/// How the addresses of one run are geocoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeMode {
    /// One lookup at a time, stopping at the first failure.
    #[default]
    Sequential,
    /// All lookups in flight at once on the rayon pool.
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Validating,
    Geocoding,
    RequestingRoute,
    Reconciled,
    Failed(Failure),
}

type Observer = Box<dyn FnMut(&RunState) + Send>;

pub struct RouteOptimizer<G, R, T = TimeOfDayTraffic> {
    geocoder: G,
    router: R,
    traffic: T,
    starting_point: Option<String>,
    route_options: RouteOptions,
    geocode_mode: GeocodeMode,
    entries: Vec<StopEntry>,
    state: RunState,
    published: Option<PublishedRoute>,
    observer: Option<Observer>,
}

impl<G, R, T> RouteOptimizer<G, R, T>
where
    G: Geocoder,
    R: RouteProvider,
    T: TrafficModel,
{
    /// Starts with a single blank entry, like an empty address form.
    pub fn new(geocoder: G, router: R, traffic: T) -> Self {
        Self {
            geocoder,
            router,
            traffic,
            starting_point: None,
            route_options: RouteOptions::default(),
            geocode_mode: GeocodeMode::default(),
            entries: vec![StopEntry::default()],
            state: RunState::Idle,
            published: None,
            observer: None,
        }
    }

    /// Fixed address every route starts from. Blank addresses are ignored.
    pub fn with_starting_point(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        let address = address.trim();
        self.starting_point = (!address.is_empty()).then(|| address.to_string());
        self
    }

    pub fn with_route_options(mut self, options: RouteOptions) -> Self {
        self.route_options = options;
        self
    }

    pub fn with_geocode_mode(mut self, mode: GeocodeMode) -> Self {
        self.geocode_mode = mode;
        self
    }

    /// Registers a callback invoked on every state change.
    pub fn on_transition(&mut self, observer: impl FnMut(&RunState) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn entries(&self) -> &[StopEntry] {
        &self.entries
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Last successfully published route, if any.
    pub fn published(&self) -> Option<&PublishedRoute> {
        self.published.as_ref()
    }

    pub fn starting_point(&self) -> Option<&str> {
        self.starting_point.as_deref()
    }

    pub fn add_address(&mut self) {
        self.entries.push(StopEntry::default());
        self.reset();
    }

    pub fn set_address(
        &mut self,
        index: usize,
        address: impl Into<String>,
    ) -> Result<(), OptimizeError> {
        self.entry_mut(index)?.address = address.into();
        self.reset();
        Ok(())
    }

    pub fn set_appointment(
        &mut self,
        index: usize,
        time: Option<&str>,
    ) -> Result<(), OptimizeError> {
        self.entry_mut(index)?.appointment = normalize_appointment(time);
        self.reset();
        Ok(())
    }

    pub fn remove_address(&mut self, index: usize) -> Result<StopEntry, OptimizeError> {
        self.entry_mut(index)?;
        let removed = self.entries.remove(index);
        self.reset();
        Ok(removed)
    }

    /// Replaces every entry at once.
    pub fn set_entries(&mut self, entries: Vec<StopEntry>) {
        self.entries = entries;
        self.reset();
    }

    /// Runs the workflow using the current local hour for traffic.
    pub fn optimize(&mut self) -> Result<&PublishedRoute, OptimizeError> {
        let hour = chrono::Local::now().hour();
        self.optimize_at_hour(hour)
    }

    /// Runs the workflow as if started during `hour`.
    pub fn optimize_at_hour(&mut self, hour: u32) -> Result<&PublishedRoute, OptimizeError> {
        tracing::info!(
            stops = self.entries.len(),
            starting_point = self.starting_point.is_some(),
            mode = ?self.route_options.mode,
            hour,
            "optimizing route"
        );

        match self.run(hour) {
            Ok(route) => {
                tracing::info!(
                    stops = route.itinerary.len(),
                    distance_km = route.summary.distance_km,
                    duration_minutes = route.summary.duration_minutes,
                    "route published"
                );
                self.transition(RunState::Reconciled);
                Ok(&*self.published.insert(route))
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), error = %err, "route optimization failed");
                self.transition(RunState::Failed(Failure::from(&err)));
                Err(err)
            }
        }
    }

    fn run(&mut self, hour: u32) -> Result<PublishedRoute, OptimizeError> {
        self.transition(RunState::Validating);
        validate(&self.entries)?;

        self.transition(RunState::Geocoding);
        let stops = self.geocode_all()?;

        self.transition(RunState::RequestingRoute);
        let request = build_request(
            &stops.coordinates(),
            &self.route_options,
            stops.starting_point.is_some(),
        );
        let result = self.router.request_route(&request)?;

        let multiplier = self.traffic.multiplier(hour);
        let itinerary = reconcile(&result, &stops, &self.entries)?;
        let summary = RouteSummary::new(&result, multiplier);

        Ok(PublishedRoute {
            itinerary,
            summary,
            geometry: result.geometry,
        })
    }

    fn geocode_all(&self) -> Result<GeocodedStops, OptimizeError> {
        let geocoder = &self.geocoder;

        let starting_point = match &self.starting_point {
            Some(address) => Some((address.clone(), locate(geocoder, address)?)),
            None => None,
        };

        let addresses = self
            .entries
            .iter()
            .map(|entry| entry.address.trim())
            .collect::<Vec<_>>();

        let visits = match self.geocode_mode {
            GeocodeMode::Sequential => addresses
                .iter()
                .map(|address| locate(geocoder, address))
                .collect::<Result<Vec<_>, _>>()?,
            GeocodeMode::Concurrent => addresses
                .par_iter()
                .map(|address| locate(geocoder, address))
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(GeocodedStops {
            starting_point,
            visits,
        })
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut StopEntry, OptimizeError> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(OptimizeError::IndexOutOfRange { index, len })
    }

    fn reset(&mut self) {
        if self.state != RunState::Idle {
            self.transition(RunState::Idle);
        }
    }

    fn transition(&mut self, state: RunState) {
        tracing::debug!(from = ?self.state, to = ?state, "workflow transition");
        self.state = state;
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state);
        }
    }
}

fn validate(entries: &[StopEntry]) -> Result<(), OptimizeError> {
    if entries.is_empty() {
        return Err(OptimizeError::NoAddresses);
    }
    match entries.iter().position(|entry| entry.address.trim().is_empty()) {
        Some(position) => Err(OptimizeError::EmptyAddress { position }),
        None => Ok(()),
    }
}

fn locate<G: Geocoder + ?Sized>(geocoder: &G, address: &str) -> Result<Coordinate, OptimizeError> {
    geocoder
        .geocode(address)?
        .ok_or_else(|| OptimizeError::NotFound {
            address: address.to_string(),
        })
}
