//! End-to-end delivery routing over a shared road network.
//!
//! The network and the depot node are set up once per process; each request
//! resolves its stops, builds the pairwise matrix, solves the tour exactly and
//! reconstructs its geometry.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::RouteError;
use crate::matrix;
use crate::polyline::Polyline;
use crate::route;
use crate::traits::{DistanceOracle, LatLon, NodeId, NodeResolver, RoadGraph};
use crate::tsp::{self, MAX_EXACT_LOCATIONS};

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Warehouse location (lat, lon).
    pub depot: LatLon,
    /// Upper bound on depot + stops accepted per request.
    pub max_locations: usize,
    /// Spread shortest-path queries across the rayon pool.
    pub parallel_matrix: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            depot: (12.9716, 77.5946), // Bengaluru central, near MG Road
            max_locations: 16,
            parallel_matrix: true,
        }
    }
}

impl PlannerConfig {
    /// Effective bound, never above what the exact solver can hold.
    pub fn location_limit(&self) -> usize {
        self.max_locations.min(MAX_EXACT_LOCATIONS)
    }
}

/// Result of a routing request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Road-following (lat, lon) polyline of the whole tour.
    pub full_route: Polyline,
    /// Location indices in visiting order; 0 is the depot, stops start at 1.
    pub tour: Vec<usize>,
    /// Cumulative kilometers after each leg.
    pub leg_distances_km: Vec<f64>,
    pub total_distance_m: f64,
}

pub struct RoutePlanner<G> {
    graph: Arc<G>,
    config: PlannerConfig,
    depot_node: NodeId,
}

impl<G> RoutePlanner<G>
where
    G: RoadGraph + DistanceOracle + NodeResolver + Send + Sync,
{
    /// Resolves the depot once; it is reused by every request.
    pub fn new(graph: Arc<G>, config: PlannerConfig) -> Result<Self, RouteError> {
        let depot_node = resolve(graph.as_ref(), 0, config.depot)?;
        info!(
            "Warehouse location ({}, {}) resolved to node {}",
            config.depot.0, config.depot.1, depot_node
        );

        Ok(Self {
            graph,
            config,
            depot_node,
        })
    }

    pub fn depot_node(&self) -> NodeId {
        self.depot_node
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    /// Shortest closed tour from the depot through every delivery location.
    ///
    /// Location `i` in `deliveries` is index `i + 1` in the returned tour.
    pub fn optimal_route(&self, deliveries: &[LatLon]) -> Result<RoutePlan, RouteError> {
        let count = deliveries.len() + 1;
        let limit = self.config.location_limit();
        if count > limit {
            return Err(RouteError::TooManyStops { count, max: limit });
        }

        let mut nodes = Vec::with_capacity(count);
        nodes.push(self.depot_node);
        for (i, &location) in deliveries.iter().enumerate() {
            nodes.push(resolve(self.graph.as_ref(), i + 1, location)?);
        }

        let (matrix, paths) = if self.config.parallel_matrix {
            matrix::build_parallel(self.graph.as_ref(), &nodes)
        } else {
            matrix::build(self.graph.as_ref(), &nodes)
        };

        let solution = tsp::solve(count, |i, j| matrix.get(i, j));
        info!("Shortest distance (meters): {}", solution.cost);
        info!("Optimal path indices: {:?}", solution.tour);
        if !solution.is_feasible() {
            return Err(RouteError::InfeasibleTour { cost: solution.cost });
        }

        let geometry = route::reconstruct(
            &solution.tour,
            &nodes,
            &matrix,
            &paths,
            self.graph.as_ref(),
        )?;

        Ok(RoutePlan {
            full_route: geometry.polyline,
            tour: solution.tour,
            leg_distances_km: geometry.leg_distances_km,
            total_distance_m: solution.cost,
        })
    }
}

fn resolve<R: NodeResolver + ?Sized>(
    resolver: &R,
    index: usize,
    location: LatLon,
) -> Result<NodeId, RouteError> {
    let (lat, lon) = location;
    if !lat.is_finite() || !lon.is_finite() {
        return Err(RouteError::InvalidLocation { index });
    }
    resolver
        .nearest_node(lon, lat)
        .ok_or(RouteError::Resolution { index, lat, lon })
}
