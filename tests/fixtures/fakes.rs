//! In-memory geocoding and routing backends.
//!
//! Both fakes hand out a shared call log so a test can inspect what the
//! optimizer asked for after handing the fake over.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use homecare_route_optimizer::polyline::Polyline;
use homecare_route_optimizer::{
    Coordinate, Geocoder, OptimizeError, RouteProvider, RouteRequest, RouteResult,
};

use super::Address;

pub type CallLog<T> = Arc<Mutex<Vec<T>>>;

/// Geocoder answering from a fixed address book.
pub struct FakeGeocoder {
    known: HashMap<String, Coordinate>,
    calls: CallLog<String>,
}

impl FakeGeocoder {
    pub fn new(addresses: &[Address]) -> Self {
        Self {
            known: addresses
                .iter()
                .map(|address| (address.text.to_string(), address.coordinate()))
                .collect(),
            calls: CallLog::default(),
        }
    }

    pub fn calls(&self) -> CallLog<String> {
        Arc::clone(&self.calls)
    }
}

impl Geocoder for FakeGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, OptimizeError> {
        self.calls.lock().unwrap().push(address.to_string());
        Ok(self.known.get(address).copied())
    }
}

enum ScriptedFailure {
    Routing(String),
    Decode(String),
}

/// Router returning a scripted stop order and totals.
pub struct FakeRouter {
    order: Option<Vec<usize>>,
    failure: Option<ScriptedFailure>,
    successes_before_failure: usize,
    distance_km: f64,
    duration_minutes: f64,
    requests: CallLog<RouteRequest>,
}

impl FakeRouter {
    /// Keeps the input order.
    pub fn identity(distance_km: f64, duration_minutes: f64) -> Self {
        Self {
            order: None,
            failure: None,
            successes_before_failure: 0,
            distance_km,
            duration_minutes,
            requests: CallLog::default(),
        }
    }

    pub fn with_order(mut self, order: Vec<usize>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(ScriptedFailure::Routing(message.to_string())),
            ..Self::identity(0.0, 0.0)
        }
    }

    /// Answers `successes` requests, then fails every later one with an
    /// undecodable response.
    pub fn garbled_after(mut self, successes: usize, reason: &str) -> Self {
        self.failure = Some(ScriptedFailure::Decode(reason.to_string()));
        self.successes_before_failure = successes;
        self
    }

    pub fn requests(&self) -> CallLog<RouteRequest> {
        Arc::clone(&self.requests)
    }
}

impl RouteProvider for FakeRouter {
    fn request_route(&self, request: &RouteRequest) -> Result<RouteResult, OptimizeError> {
        let answered = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        if answered >= self.successes_before_failure {
            match &self.failure {
                Some(ScriptedFailure::Routing(message)) => {
                    return Err(OptimizeError::Routing {
                        service: "fake router",
                        message: message.clone(),
                    });
                }
                Some(ScriptedFailure::Decode(reason)) => {
                    return Err(OptimizeError::Decode {
                        service: "fake router",
                        reason: reason.clone(),
                    });
                }
                None => {}
            }
        }

        let order = self
            .order
            .clone()
            .unwrap_or_else(|| (0..request.coordinates.len()).collect());
        Ok(RouteResult::from_km_minutes(
            order,
            Polyline::new(request.coordinates.clone()),
            self.distance_km,
            self.duration_minutes,
        ))
    }
}
