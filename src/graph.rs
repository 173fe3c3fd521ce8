//! In-memory road network.
//!
//! A directed multigraph over OSM nodes. Edges carry their length in meters and
//! an optional curve geometry (x = longitude, y = latitude). Once built, the
//! network is shared read-only across routing requests.

use std::collections::HashMap;

use geo_types::LineString;
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::error::GraphDataError;
use crate::haversine::{ground_distance_floor_m, haversine_m};
use crate::traits::{DistanceOracle, EdgeShape, LatLon, NoPath, NodeId, NodeResolver, RoadGraph};

#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    /// Distinguishes parallel edges between the same ordered pair; starts at 0.
    pub key: u32,
    pub length_m: f64,
    pub geometry: Option<LineString<f64>>,
}

/// Snap index entry at `[lon, lat]`; the tree orders candidates by plain
/// degree distance and [`RoadNetwork::nearest_node`] re-ranks them.
type SnapPoint = GeomWithData<[f64; 2], NodeId>;

#[derive(Debug, Default)]
pub struct RoadNetwork {
    graph: DiGraph<NodeData, EdgeData>,
    index: HashMap<NodeId, NodeIndex>,
    snap: RTree<SnapPoint>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing one if `id` is already present.
    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(NodeData { id, lat, lon });
        self.index.insert(id, idx);
        self.snap.insert(SnapPoint::new([lon, lat], id));
        idx
    }

    /// Adds a directed edge and returns its key among edges `from -> to`.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        geometry: Option<LineString<f64>>,
    ) -> Result<u32, GraphDataError> {
        let a = *self.index.get(&from).ok_or(GraphDataError::UnknownNode(from))?;
        let b = *self.index.get(&to).ok_or(GraphDataError::UnknownNode(to))?;
        let key = self.graph.edges_connecting(a, b).count() as u32;
        self.graph.add_edge(
            a,
            b,
            EdgeData {
                key,
                length_m,
                geometry,
            },
        );
        Ok(key)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> + '_ {
        self.graph.raw_nodes().iter().map(|node| &node.weight)
    }

    /// Edges in insertion order as (from, to, data).
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeData)> + '_ {
        self.graph.edge_references().map(|edge| {
            (self.graph[edge.source()].id, self.graph[edge.target()].id, edge.weight())
        })
    }
}

impl RoadGraph for RoadNetwork {
    fn node_coords(&self, node: NodeId) -> Option<LatLon> {
        self.index.get(&node).map(|&idx| {
            let data = &self.graph[idx];
            (data.lat, data.lon)
        })
    }

    fn edge_shape(&self, from: NodeId, to: NodeId) -> EdgeShape {
        let (Some(&a), Some(&b)) = (self.index.get(&from), self.index.get(&to)) else {
            return EdgeShape::Missing;
        };

        let designated = self.graph.edges_connecting(a, b).min_by_key(|edge| edge.weight().key);

        match designated {
            None => EdgeShape::Missing,
            Some(edge) => match &edge.weight().geometry {
                Some(line) => EdgeShape::Curve(line.coords().map(|c| (c.y, c.x)).collect()),
                None => EdgeShape::Straight,
            },
        }
    }
}

impl DistanceOracle for RoadNetwork {
    fn distance_and_path(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> Result<(f64, Vec<NodeId>), NoPath> {
        let no_path = NoPath {
            from: source,
            to: target,
        };
        let (Some(&start), Some(&goal)) = (self.index.get(&source), self.index.get(&target)) else {
            return Err(no_path);
        };

        // A* with a zero heuristic is Dijkstra that also yields the path.
        let (length, path) = astar(
            &self.graph,
            start,
            |n| n == goal,
            |edge| edge.weight().length_m,
            |_| 0.0,
        )
        .ok_or(no_path)?;

        Ok((length, path.into_iter().map(|idx| self.graph[idx].id).collect()))
    }
}

impl NodeResolver for RoadNetwork {
    /// Node with the smallest great-circle distance to (lat, lon).
    ///
    /// Candidates arrive in degree-distance order; the scan stops once no
    /// farther candidate can beat the best ground distance found so far.
    fn nearest_node(&self, lon: f64, lat: f64) -> Option<NodeId> {
        let mut best: Option<(f64, NodeId)> = None;
        for candidate in self.snap.nearest_neighbor_iter(&[lon, lat]) {
            let [node_lon, node_lat] = *candidate.geom();
            if let Some((best_m, _)) = best {
                let offset_deg = (node_lon - lon).hypot(node_lat - lat);
                if ground_distance_floor_m(lat, offset_deg) > best_m {
                    break;
                }
            }
            let meters = haversine_m((lat, lon), (node_lat, node_lon));
            if best.is_none_or(|(best_m, _)| meters < best_m) {
                best = Some((meters, candidate.data));
            }
        }
        best.map(|(_, id)| id)
    }
}
