//! Turns a solved tour into drawable geometry and cumulative leg distances.

use tracing::debug;

use crate::error::RouteError;
use crate::matrix::{DistanceMatrix, PathCache};
use crate::polyline::Polyline;
use crate::traits::{EdgeShape, NodeId, RoadGraph};

#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub polyline: Polyline,
    /// Cumulative distance in kilometers (2 decimals) after each tour leg.
    pub leg_distances_km: Vec<f64>,
}

/// Rounds meters to kilometers with two decimals.
pub fn meters_to_km(meters: f64) -> f64 {
    (meters / 1000.0 * 100.0).round() / 100.0
}

/// Builds the polyline and leg distances for `tour`.
///
/// A tour with an infinite-distance leg is rejected as
/// [`RouteError::InfeasibleTour`] before any geometry is assembled. A finite
/// leg without a cached path is reported as [`RouteError::UnreachablePair`].
pub fn reconstruct<G: RoadGraph + ?Sized>(
    tour: &[usize],
    nodes: &[NodeId],
    matrix: &DistanceMatrix,
    paths: &PathCache,
    graph: &G,
) -> Result<RouteGeometry, RouteError> {
    let tour_m: f64 = tour.windows(2).map(|leg| matrix.get(leg[0], leg[1])).sum();
    if !tour_m.is_finite() {
        return Err(RouteError::InfeasibleTour { cost: tour_m });
    }

    let mut polyline = Polyline::default();
    let mut leg_distances_km = Vec::with_capacity(tour.len().saturating_sub(1));
    let mut total_m = 0.0;

    for leg in tour.windows(2) {
        let (from, to) = (leg[0], leg[1]);
        if from != to {
            let path = paths
                .get(from, to)
                .ok_or(RouteError::UnreachablePair { from, to })?;
            append_path(&mut polyline, path, graph);
        }

        total_m += matrix.get(from, to);
        leg_distances_km.push(meters_to_km(total_m));
    }

    if let Some(&last) = tour.last() {
        if let Some(point) = graph.node_coords(nodes[last]) {
            polyline.push(point);
        }
    }

    debug!(
        "Reconstructed {} legs into {} points ({} km)",
        leg_distances_km.len(),
        polyline.len(),
        meters_to_km(total_m)
    );

    Ok(RouteGeometry {
        polyline,
        leg_distances_km,
    })
}

fn append_path<G: RoadGraph + ?Sized>(polyline: &mut Polyline, path: &[NodeId], graph: &G) {
    for pair in path.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        match graph.edge_shape(u, v) {
            EdgeShape::Curve(points) => polyline.extend_from_slice(&points),
            EdgeShape::Straight | EdgeShape::Missing => {
                if let (Some(a), Some(b)) = (graph.node_coords(u), graph.node_coords(v)) {
                    polyline.push(a);
                    polyline.push(b);
                }
            }
        }
    }
}
