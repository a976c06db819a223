//! Joins a routing result back onto the user's entries to produce the
//! ordered, display-ready itinerary.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, round2};
use crate::error::OptimizeError;
use crate::polyline::Polyline;
use crate::route::{RouteResult, check_permutation};

/// Marker shown instead of an appointment time for the starting point.
pub const STARTING_POINT_LABEL: &str = "starting point";

/// One address row as the user entered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopEntry {
    pub address: String,
    /// `HH:MM`, unvalidated.
    pub appointment: Option<String>,
}

impl StopEntry {
    pub fn new(address: impl Into<String>, appointment: Option<&str>) -> Self {
        Self {
            address: address.into(),
            appointment: normalize_appointment(appointment),
        }
    }
}

pub(crate) fn normalize_appointment(time: Option<&str>) -> Option<String> {
    time.map(str::trim)
        .filter(|time| !time.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopKind {
    StartingPoint,
    Visit { appointment: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryItem {
    pub position: usize,
    pub address: String,
    #[serde(flatten)]
    pub kind: StopKind,
    pub coordinate: Coordinate,
}

impl ItineraryItem {
    /// Appointment time, or the starting point marker.
    pub fn time_or_marker(&self) -> Option<&str> {
        match &self.kind {
            StopKind::StartingPoint => Some(STARTING_POINT_LABEL),
            StopKind::Visit { appointment } => appointment.as_deref(),
        }
    }
}

/// Totals shown next to the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub raw_duration_minutes: f64,
    pub traffic_multiplier: f64,
    /// Traffic-adjusted duration.
    pub duration_minutes: f64,
}

impl RouteSummary {
    pub fn new(result: &RouteResult, traffic_multiplier: f64) -> Self {
        Self {
            distance_km: result.distance_km,
            raw_duration_minutes: result.duration_minutes,
            traffic_multiplier,
            duration_minutes: round2(result.duration_minutes * traffic_multiplier),
        }
    }
}

impl std::fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} km, {:.2} min", self.distance_km, self.duration_minutes)
    }
}

/// Everything published by one successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedRoute {
    pub itinerary: Vec<ItineraryItem>,
    pub summary: RouteSummary,
    /// Path to draw between the markers.
    pub geometry: Polyline,
}

/// Geocoding output for one run, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedStops {
    pub starting_point: Option<(String, Coordinate)>,
    /// One coordinate per entry.
    pub visits: Vec<Coordinate>,
}

impl GeocodedStops {
    /// Coordinate list sent to the routing service; the starting point leads.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.starting_point
            .iter()
            .map(|(_, coord)| *coord)
            .chain(self.visits.iter().copied())
            .collect()
    }
}

/// Orders the entries by the routing service's returned stop order.
///
/// The starting point, if any, is always item 0. Visits follow
/// `result.stop_order`, never the original entry order.
pub fn reconcile(
    result: &RouteResult,
    stops: &GeocodedStops,
    entries: &[StopEntry],
) -> Result<Vec<ItineraryItem>, OptimizeError> {
    if stops.visits.len() != entries.len() {
        return Err(OptimizeError::routing(
            "route reconciliation",
            format!(
                "{} coordinates for {} entries",
                stops.visits.len(),
                entries.len()
            ),
        ));
    }

    let offset = usize::from(stops.starting_point.is_some());
    check_permutation("routing service", &result.stop_order, entries.len() + offset)?;

    let mut items = Vec::with_capacity(entries.len() + offset);
    if let Some((address, coordinate)) = &stops.starting_point {
        items.push(ItineraryItem {
            position: 0,
            address: address.clone(),
            kind: StopKind::StartingPoint,
            coordinate: *coordinate,
        });
    }

    for &index in &result.stop_order {
        let Some(entry_index) = index.checked_sub(offset) else {
            continue;
        };
        let entry = &entries[entry_index];
        items.push(ItineraryItem {
            position: items.len(),
            address: entry.address.clone(),
            kind: StopKind::Visit {
                appointment: entry.appointment.clone(),
            },
            coordinate: stops.visits[entry_index],
        });
    }

    Ok(items)
}
