//! Polyline representation for route geometries.
//!
//! Points are stored as decoded (latitude, longitude) pairs in travel order.
//! Serializes as a plain array of `[lat, lon]` pairs so map clients can draw it
//! directly.

use serde::{Deserialize, Serialize};

use crate::traits::LatLon;

/// Ordered (lat, lon) points of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<LatLon>,
}

impl Polyline {
    /// Creates a new Polyline from (lat, lon) points.
    pub fn new(points: Vec<LatLon>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: LatLon) {
        self.points.push(point);
    }

    /// Appends a road segment's points.
    pub fn extend_from_slice(&mut self, points: &[LatLon]) {
        self.points.extend_from_slice(points);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<LatLon> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<LatLon> {
        self.points.last().copied()
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<LatLon> {
        self.points
    }
}
