//! Polyline representation for route geometries.
//!
//! Routing services return geometries as GeoJSON position arrays; they are
//! decoded into [`Coordinate`]s at the client boundary so the rest of the
//! crate (and the map layer consuming the published route) only deals with
//! checked coordinates.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// An ordered coordinate sequence describing the path to draw on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes GeoJSON `[lng, lat]` positions.
    ///
    /// Returns `None` if any position is short or non-finite.
    pub fn from_positions(positions: &[Vec<f64>]) -> Option<Self> {
        positions
            .iter()
            .map(|position| Coordinate::from_position(position))
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// South-west and north-east corners, for fitting the map viewport.
    pub fn bounds(&self) -> Option<(Coordinate, Coordinate)> {
        let first = self.points.first()?;
        let (mut min_lng, mut min_lat) = (first.lng(), first.lat());
        let (mut max_lng, mut max_lat) = (min_lng, min_lat);
        for point in &self.points[1..] {
            min_lng = min_lng.min(point.lng());
            min_lat = min_lat.min(point.lat());
            max_lng = max_lng.max(point.lng());
            max_lat = max_lat.max(point.lat());
        }
        Some((
            Coordinate::new(min_lng, min_lat)?,
            Coordinate::new(max_lng, max_lat)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lng: f64, lat: f64) -> Coordinate {
        Coordinate::new(lng, lat).unwrap()
    }

    #[test]
    fn test_from_positions() {
        let positions = vec![vec![-120.2, 38.5], vec![-120.95, 40.7]];
        let polyline = Polyline::from_positions(&positions).unwrap();
        assert_eq!(polyline.points(), &[coord(-120.2, 38.5), coord(-120.95, 40.7)]);
    }

    #[test]
    fn test_from_positions_rejects_short_position() {
        let positions = vec![vec![-120.2, 38.5], vec![-120.95]];
        assert!(Polyline::from_positions(&positions).is_none());
    }

    #[test]
    fn test_into_points() {
        let points = vec![coord(1.0, 2.0), coord(3.0, 4.0)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::new(vec![]);
        assert!(polyline.is_empty());
        assert!(polyline.bounds().is_none());
    }

    #[test]
    fn test_bounds() {
        let polyline = Polyline::new(vec![coord(-9.1, 38.7), coord(-9.3, 38.8), coord(-9.2, 38.6)]);
        let (sw, ne) = polyline.bounds().unwrap();
        assert_eq!(sw, coord(-9.3, 38.6));
        assert_eq!(ne, coord(-9.1, 38.8));
    }
}
