//! Time-of-day traffic adjustment.
//!
//! A fixed step function over the hour of day. It is a placeholder for a
//! real traffic lookup and only ever touches durations.

use crate::traits::TrafficModel;

/// Multiplier during the morning (07-09) and evening (16-19) rush.
pub const RUSH_HOUR_MULTIPLIER: f64 = 1.3;

/// Multiplier between the rush hours (10-15).
pub const DAYTIME_MULTIPLIER: f64 = 1.1;

/// Multiplier at all other hours.
pub const OFF_PEAK_MULTIPLIER: f64 = 1.0;

pub fn traffic_multiplier(hour: u32) -> f64 {
    match hour {
        7..=9 | 16..=19 => RUSH_HOUR_MULTIPLIER,
        10..=15 => DAYTIME_MULTIPLIER,
        _ => OFF_PEAK_MULTIPLIER,
    }
}

/// Default [`TrafficModel`] backed by [`traffic_multiplier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOfDayTraffic;

impl TrafficModel for TimeOfDayTraffic {
    fn multiplier(&self, hour: u32) -> f64 {
        traffic_multiplier(hour)
    }
}
