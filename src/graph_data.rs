//! Road network acquisition with an on-disk cache.
//!
//! The first run downloads the network from Overpass and writes a JSON cache;
//! later runs load the cache instead.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use geo_types::LineString;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::GraphDataError;
use crate::graph::RoadNetwork;
use crate::overpass::{BoundingBox, OverpassClient, OverpassConfig, build_network};
use crate::traits::NodeId;

/// Cache format version. Bump this when changing the cache structure.
pub const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct GraphSourceConfig {
    pub bbox: BoundingBox,
    pub cache_path: PathBuf,
    pub overpass: OverpassConfig,
}

impl GraphSourceConfig {
    pub fn new(bbox: BoundingBox, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            bbox,
            cache_path: cache_path.into(),
            overpass: OverpassConfig::default(),
        }
    }
}

impl Default for GraphSourceConfig {
    fn default() -> Self {
        Self::new(BoundingBox::bengaluru(), "bengaluru_drive.json")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedNetwork {
    version: u32,
    nodes: Vec<CachedNode>,
    edges: Vec<CachedEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedNode {
    id: i64,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedEdge {
    from: i64,
    to: i64,
    length_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<LineString<f64>>,
}

/// Loads the cached network, downloading and caching it when the cache is
/// missing or unreadable.
pub fn load_or_fetch(config: &GraphSourceConfig) -> Result<RoadNetwork, GraphDataError> {
    if config.cache_path.exists() {
        info!("Loading cached map data from {}", config.cache_path.display());
        match load_cache(&config.cache_path) {
            Ok(network) => return Ok(network),
            Err(err) => warn!("Graph cache unusable ({}), downloading fresh", err),
        }
    }

    info!("Downloading road network from Overpass");
    let client = OverpassClient::new(config.overpass.clone())?;
    let response = client.fetch_drive_network(&config.bbox)?;
    let network = build_network(&response)?;

    if let Err(err) = save_cache(&network, &config.cache_path) {
        warn!("Could not save map cache: {}", err);
    } else {
        info!("Saved road network to {}", config.cache_path.display());
    }

    Ok(network)
}

pub fn save_cache(network: &RoadNetwork, path: &Path) -> Result<(), GraphDataError> {
    let cached = CachedNetwork {
        version: CACHE_VERSION,
        nodes: network
            .nodes()
            .map(|node| CachedNode {
                id: node.id.0,
                lat: node.lat,
                lon: node.lon,
            })
            .collect(),
        edges: network
            .edges()
            .map(|(from, to, edge)| CachedEdge {
                from: from.0,
                to: to.0,
                length_m: edge.length_m,
                geometry: edge.geometry.clone(),
            })
            .collect(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    serde_json::to_writer(&mut writer, &cached)?;
    writer.flush()?;
    drop(writer);
    fs::rename(tmp_path, path)?;
    Ok(())
}

pub fn load_cache(path: &Path) -> Result<RoadNetwork, GraphDataError> {
    let reader = BufReader::new(File::open(path)?);
    let cached: CachedNetwork = serde_json::from_reader(reader)?;
    if cached.version != CACHE_VERSION {
        return Err(GraphDataError::CacheVersion {
            found: cached.version,
            expected: CACHE_VERSION,
        });
    }

    let mut network = RoadNetwork::new();
    for node in &cached.nodes {
        network.add_node(NodeId(node.id), node.lat, node.lon);
    }
    // Edges are stored in insertion order, so parallel edge keys survive.
    for edge in cached.edges {
        network.add_edge(NodeId(edge.from), NodeId(edge.to), edge.length_m, edge.geometry)?;
    }

    if network.node_count() == 0 {
        return Err(GraphDataError::EmptyNetwork);
    }

    info!(
        "Loaded road network with {} nodes and {} edges",
        network.node_count(),
        network.edge_count()
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{DistanceOracle, EdgeShape, RoadGraph};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("delivery-router-{}-{}.json", name, std::process::id()))
    }

    fn sample() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_node(NodeId(1), 12.0, 77.0);
        network.add_node(NodeId(2), 12.001, 77.001);
        network.add_edge(NodeId(1), NodeId(2), 150.0, None).unwrap();
        let curve = LineString::from(vec![(77.0, 12.0), (77.0005, 12.0008), (77.001, 12.001)]);
        network.add_edge(NodeId(1), NodeId(2), 160.0, Some(curve)).unwrap();
        network.add_edge(NodeId(2), NodeId(1), 150.0, None).unwrap();
        network
    }

    #[test]
    fn test_cache_preserves_topology_and_keys() {
        let path = temp_path("preserve");
        save_cache(&sample(), &path).unwrap();
        let loaded = load_cache(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.edge_count(), 3);
        assert_eq!(loaded.node_coords(NodeId(2)), Some((12.001, 77.001)));
        // Key 0 is still the straight edge.
        assert_eq!(loaded.edge_shape(NodeId(1), NodeId(2)), EdgeShape::Straight);
        let keys: Vec<u32> = loaded.edges().map(|(_, _, edge)| edge.key).collect();
        assert_eq!(keys, vec![0, 1, 0]);
        assert_eq!(loaded.distance_and_path(NodeId(1), NodeId(2)).unwrap().0, 150.0);
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let path = temp_path("version");
        fs::write(&path, r#"{"version":0,"nodes":[],"edges":[]}"#).unwrap();
        let result = load_cache(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(
            result,
            Err(GraphDataError::CacheVersion { found: 0, expected: CACHE_VERSION })
        ));
    }

    #[test]
    fn test_load_or_fetch_prefers_cache() {
        let path = temp_path("prefer");
        save_cache(&sample(), &path).unwrap();
        let mut config = GraphSourceConfig::new(BoundingBox::new(0.0, 0.0, 0.0, 0.0), &path);
        // Unroutable endpoint: any download attempt would fail.
        config.overpass.base_url = "http://127.0.0.1:9/".to_string();
        let loaded = load_or_fetch(&config);
        fs::remove_file(&path).ok();
        assert_eq!(loaded.unwrap().node_count(), 2);
    }
}
