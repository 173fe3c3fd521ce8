//! Core seams between the routing engine and the road network.
//!
//! The engine never owns the graph. It only needs node coordinates, shortest
//! paths by length, the designated edge between two nodes, and a way to snap
//! raw coordinates onto the network.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque road-network vertex identifier (an OSM node id for built networks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic coordinate as (latitude, longitude).
pub type LatLon = (f64, f64);

/// Returned by a [`DistanceOracle`] when the target cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no path from node {from} to node {to}")]
pub struct NoPath {
    pub from: NodeId,
    pub to: NodeId,
}

/// Read-only view of a road network.
pub trait RoadGraph {
    /// Node coordinate as (lat, lon), `None` if the node is unknown.
    fn node_coords(&self, node: NodeId) -> Option<LatLon>;

    /// Shape of the designated edge `from -> to`. When parallel edges exist,
    /// the one with the lowest key is designated.
    fn edge_shape(&self, from: NodeId, to: NodeId) -> EdgeShape;
}

/// Shape of the designated edge between two consecutive path nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeShape {
    /// Stored road-shape points, already in (lat, lon) order.
    Curve(Vec<LatLon>),
    /// The edge exists but has no stored shape.
    Straight,
    /// No edge connects the pair.
    Missing,
}

/// Shortest path by edge length between two nodes.
pub trait DistanceOracle {
    /// Distance in meters and the node sequence, source and target included.
    fn distance_and_path(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> Result<(f64, Vec<NodeId>), NoPath>;
}

/// Maps a raw coordinate to its nearest network node.
pub trait NodeResolver {
    fn nearest_node(&self, lon: f64, lat: f64) -> Option<NodeId>;
}
