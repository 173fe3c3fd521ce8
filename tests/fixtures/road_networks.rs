//! Synthetic road networks with exact edge lengths.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo_types::LineString;

use delivery_router::graph::RoadNetwork;
use delivery_router::traits::{
    DistanceOracle, EdgeShape, LatLon, NoPath, NodeId, NodeResolver, RoadGraph,
};

pub const BASE_LAT: f64 = 12.97;
pub const BASE_LON: f64 = 77.59;
pub const STEP_DEG: f64 = 0.001;

/// Coordinates of grid cell (row, col).
pub fn grid_coords(row: usize, col: usize) -> LatLon {
    (BASE_LAT + row as f64 * STEP_DEG, BASE_LON + col as f64 * STEP_DEG)
}

pub fn grid_node(cols: usize, row: usize, col: usize) -> NodeId {
    NodeId((row * cols + col + 1) as i64)
}

/// Two-way `rows x cols` street grid, every block `block_m` meters long.
pub fn grid(rows: usize, cols: usize, block_m: f64) -> RoadNetwork {
    let mut network = RoadNetwork::new();
    for row in 0..rows {
        for col in 0..cols {
            let (lat, lon) = grid_coords(row, col);
            network.add_node(grid_node(cols, row, col), lat, lon);
        }
    }
    for row in 0..rows {
        for col in 0..cols {
            let here = grid_node(cols, row, col);
            if col + 1 < cols {
                two_way(&mut network, here, grid_node(cols, row, col + 1), block_m);
            }
            if row + 1 < rows {
                two_way(&mut network, here, grid_node(cols, row + 1, col), block_m);
            }
        }
    }
    network
}

pub fn two_way(network: &mut RoadNetwork, a: NodeId, b: NodeId, length_m: f64) {
    network.add_edge(a, b, length_m, None).expect("grid edge");
    network.add_edge(b, a, length_m, None).expect("grid edge");
}

/// Depot and two stops, every pair joined by a 100 m two-way road.
pub fn triangle() -> RoadNetwork {
    let mut network = RoadNetwork::new();
    network.add_node(NodeId(1), BASE_LAT, BASE_LON);
    network.add_node(NodeId(2), BASE_LAT, BASE_LON + STEP_DEG);
    network.add_node(NodeId(3), BASE_LAT + STEP_DEG, BASE_LON);
    two_way(&mut network, NodeId(1), NodeId(2), 100.0);
    two_way(&mut network, NodeId(1), NodeId(3), 100.0);
    two_way(&mut network, NodeId(2), NodeId(3), 100.0);
    network
}

/// Four-point road shape from the depot (node 1) to node 2, given as (lon, lat).
pub fn curved_road_points() -> Vec<(f64, f64)> {
    vec![
        (BASE_LON, BASE_LAT),
        (BASE_LON + 0.0003, BASE_LAT + 0.0004),
        (BASE_LON + 0.0007, BASE_LAT + 0.0004),
        (BASE_LON + STEP_DEG, BASE_LAT),
    ]
}

/// Depot (node 1) and one stop (node 2): curved road out, straight road back.
pub fn curved_spur() -> RoadNetwork {
    let mut network = RoadNetwork::new();
    network.add_node(NodeId(1), BASE_LAT, BASE_LON);
    network.add_node(NodeId(2), BASE_LAT, BASE_LON + STEP_DEG);
    network
        .add_edge(NodeId(1), NodeId(2), 130.0, Some(LineString::from(curved_road_points())))
        .expect("curved edge");
    network.add_edge(NodeId(2), NodeId(1), 110.0, None).expect("return edge");
    network
}

/// Counts geometry lookups made against the wrapped network.
pub struct CountingGraph {
    pub inner: RoadNetwork,
    shape_calls: AtomicUsize,
}

impl CountingGraph {
    pub fn new(inner: RoadNetwork) -> Self {
        Self {
            inner,
            shape_calls: AtomicUsize::new(0),
        }
    }

    pub fn shape_calls(&self) -> usize {
        self.shape_calls.load(Ordering::SeqCst)
    }
}

impl RoadGraph for CountingGraph {
    fn node_coords(&self, node: NodeId) -> Option<LatLon> {
        self.inner.node_coords(node)
    }

    fn edge_shape(&self, from: NodeId, to: NodeId) -> EdgeShape {
        self.shape_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.edge_shape(from, to)
    }
}

impl DistanceOracle for CountingGraph {
    fn distance_and_path(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> Result<(f64, Vec<NodeId>), NoPath> {
        self.inner.distance_and_path(source, target)
    }
}

impl NodeResolver for CountingGraph {
    fn nearest_node(&self, lon: f64, lat: f64) -> Option<NodeId> {
        self.inner.nearest_node(lon, lat)
    }
}
