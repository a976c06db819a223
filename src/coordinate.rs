//! Geographic coordinates as exchanged with the geocoding and routing services.

use serde::{Deserialize, Serialize};

/// A `(longitude, latitude)` pair with finite components.
///
/// Longitude comes first because both routing services take and return
/// GeoJSON-ordered positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lng: f64,
    lat: f64,
}

impl Coordinate {
    /// Returns `None` if either component is NaN or infinite.
    pub fn new(lng: f64, lat: f64) -> Option<Self> {
        if lng.is_finite() && lat.is_finite() {
            Some(Self { lng, lat })
        } else {
            None
        }
    }

    /// Builds a coordinate from a GeoJSON `[lng, lat]` position.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] => Self::new(*lng, *lat),
            _ => None,
        }
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// GeoJSON position, `[lng, lat]`.
    pub fn to_position(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Rounds a display value to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
