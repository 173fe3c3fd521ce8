//! Overpass API adapter for downloading drivable road networks.

use std::collections::HashMap;

use geo_types::LineString;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::GraphDataError;
use crate::graph::RoadNetwork;
use crate::haversine::polyline_length_m;
use crate::traits::{LatLon, NodeId};

/// Highway classes reachable by car.
const DRIVE_HIGHWAYS: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "residential",
    "unclassified",
    "living_street",
];

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 180,
            user_agent: "delivery-router/0.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Greater Bengaluru.
    pub fn bengaluru() -> Self {
        Self::new(12.83, 77.46, 13.14, 77.78)
    }

    fn drive_query(&self, timeout_secs: u64) -> String {
        format!(
            "[out:json][timeout:{}];\n\
             (way[\"highway\"~\"^({})$\"]({},{},{},{}););\n\
             (._;>;);\nout body;",
            timeout_secs,
            DRIVE_HIGHWAYS.join("|"),
            self.min_lat,
            self.min_lon,
            self.max_lat,
            self.max_lon
        )
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    /// Downloads the drivable ways inside `bbox` together with their nodes.
    pub fn fetch_drive_network(
        &self,
        bbox: &BoundingBox,
    ) -> Result<OverpassResponse, reqwest::Error> {
        let query = bbox.drive_query(self.config.timeout_secs);
        debug!("Overpass query:\n{}", query);

        let body = self
            .client
            .post(&self.config.base_url)
            .header("Content-Type", "text/plain")
            .body(query)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OverpassResponse>())?;

        info!("Downloaded {} OSM elements", body.elements.len());
        Ok(body)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OsmElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmElement {
    #[serde(rename = "type")]
    pub elem_type: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub nodes: Option<Vec<i64>>,
    pub tags: Option<OsmTags>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsmTags {
    pub highway: Option<String>,
    pub oneway: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Both,
    Forward,
    Backward,
}

fn is_drivable(tags: Option<&OsmTags>) -> bool {
    let class = tags.and_then(|t| t.highway.as_deref());
    class.is_some_and(|class| DRIVE_HIGHWAYS.contains(&class))
}

fn direction(tags: Option<&OsmTags>) -> Direction {
    match tags.and_then(|t| t.oneway.as_deref()) {
        Some("yes") | Some("true") | Some("1") => Direction::Forward,
        Some("-1") | Some("reverse") => Direction::Backward,
        _ => Direction::Both,
    }
}

/// Builds a simplified road network from Overpass elements.
///
/// Ways are split only at intersections (nodes shared by several ways or
/// repeated within one) and at their endpoints. Interior nodes are folded into
/// the edge's curve geometry.
pub fn build_network(response: &OverpassResponse) -> Result<RoadNetwork, GraphDataError> {
    let mut coords: HashMap<i64, LatLon> = HashMap::new();
    for elem in &response.elements {
        if elem.elem_type == "node" {
            if let (Some(lat), Some(lon)) = (elem.lat, elem.lon) {
                coords.insert(elem.id, (lat, lon));
            }
        }
    }

    let ways: Vec<(Vec<i64>, Direction)> = response
        .elements
        .iter()
        .filter(|elem| elem.elem_type == "way" && is_drivable(elem.tags.as_ref()))
        .filter_map(|elem| {
            let nodes: Vec<i64> = elem
                .nodes
                .as_ref()?
                .iter()
                .copied()
                .filter(|id| coords.contains_key(id))
                .collect();
            (nodes.len() >= 2).then(|| (nodes, direction(elem.tags.as_ref())))
        })
        .collect();

    let mut usage: HashMap<i64, usize> = HashMap::new();
    for (nodes, _) in &ways {
        for id in nodes {
            *usage.entry(*id).or_default() += 1;
        }
    }

    let mut network = RoadNetwork::new();
    for (nodes, dir) in &ways {
        let last = nodes.len() - 1;
        let mut start = 0;
        for i in 1..=last {
            if i != last && usage[&nodes[i]] < 2 {
                continue;
            }
            add_segment(&mut network, &nodes[start..=i], &coords, *dir)?;
            start = i;
        }
    }

    if network.node_count() == 0 {
        return Err(GraphDataError::EmptyNetwork);
    }

    info!(
        "Built road network with {} nodes and {} edges from {} ways",
        network.node_count(),
        network.edge_count(),
        ways.len()
    );

    Ok(network)
}

fn add_segment(
    network: &mut RoadNetwork,
    segment: &[i64],
    coords: &HashMap<i64, LatLon>,
    dir: Direction,
) -> Result<(), GraphDataError> {
    let points: Vec<LatLon> = segment.iter().map(|id| coords[id]).collect();
    let length_m = polyline_length_m(&points);

    let from = NodeId(segment[0]);
    let to = NodeId(segment[segment.len() - 1]);
    network.add_node(from, points[0].0, points[0].1);
    network.add_node(to, points[points.len() - 1].0, points[points.len() - 1].1);

    let curve = |forward: bool| {
        (points.len() > 2).then(|| {
            let xy: Vec<(f64, f64)> = if forward {
                points.iter().map(|&(lat, lon)| (lon, lat)).collect()
            } else {
                points.iter().rev().map(|&(lat, lon)| (lon, lat)).collect()
            };
            LineString::from(xy)
        })
    };

    if dir != Direction::Backward {
        network.add_edge(from, to, length_m, curve(true))?;
    }
    if dir != Direction::Forward {
        network.add_edge(to, from, length_m, curve(false))?;
    }
    Ok(())
}
