//! Error types for routing requests and graph acquisition.

use std::io;

use thiserror::Error;

use crate::traits::NodeId;

/// Hard failures of a routing request. Each variant names the stage it came from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("input: location {index} has a non-finite coordinate")]
    InvalidLocation { index: usize },

    #[error("resolution: location {index} ({lat}, {lon}) could not be mapped to a road node")]
    Resolution { index: usize, lat: f64, lon: f64 },

    #[error("input: {count} locations exceed the exact solver bound of {max}")]
    TooManyStops { count: usize, max: usize },

    #[error("solve: no closed tour visits every location (cost {cost})")]
    InfeasibleTour { cost: f64 },

    #[error("reconstruction: no road path from location {from} to location {to}")]
    UnreachablePair { from: usize, to: usize },
}

/// Failures while loading, downloading or persisting a road network.
#[derive(Debug, Error)]
pub enum GraphDataError {
    #[error("graph cache io: {0}")]
    Io(#[from] io::Error),

    #[error("overpass request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("graph cache format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph cache version {found} does not match {expected}")]
    CacheVersion { found: u32, expected: u32 },

    #[error("edge references unknown node {0}")]
    UnknownNode(NodeId),

    #[error("road network is empty")]
    EmptyNetwork,
}
