//! delivery-router core
//!
//! Exact single-vehicle delivery routing over a road network: pairwise
//! shortest paths, a bitmask-DP tour, and road-following route geometry.

pub mod error;
pub mod traits;
pub mod graph;
pub mod graph_data;
pub mod overpass;
pub mod haversine;
pub mod matrix;
pub mod tsp;
pub mod route;
pub mod polyline;
pub mod planner;

pub use error::{GraphDataError, RouteError};
pub use planner::{PlannerConfig, RoutePlan, RoutePlanner};
