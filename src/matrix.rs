//! Pairwise distance matrix and path cache over resolved location nodes.
//!
//! Everything is keyed by location index, never by node id: two locations may
//! snap to the same node and must stay distinct.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::traits::{DistanceOracle, NodeId};

/// Dense `n x n` matrix of shortest road distances in meters.
///
/// Unreachable pairs hold `f64::INFINITY`; the diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(n: usize) -> Self {
        let mut distances = vec![f64::INFINITY; n * n];
        for i in 0..n {
            distances[i * n + i] = 0.0;
        }
        Self { n, distances }
    }

    /// Builds a matrix from rows; mostly useful for tests and callers with
    /// precomputed distances.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let n = rows.len();
        let mut matrix = Self::new(n);
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate().take(n) {
                if i != j {
                    matrix.set(i, j, value);
                }
            }
        }
        matrix
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.n + to]
    }

    pub fn set(&mut self, from: usize, to: usize, meters: f64) {
        self.distances[from * self.n + to] = meters;
    }

    /// Number of off-diagonal pairs with no path.
    pub fn unreachable_pairs(&self) -> usize {
        (0..self.n)
            .flat_map(|i| (0..self.n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j && self.get(i, j).is_infinite())
            .count()
    }
}

/// Node sequences of the shortest path for each reachable ordered index pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathCache {
    paths: HashMap<(usize, usize), Vec<NodeId>>,
}

impl PathCache {
    pub fn get(&self, from: usize, to: usize) -> Option<&[NodeId]> {
        self.paths.get(&(from, to)).map(Vec::as_slice)
    }

    pub fn insert(&mut self, from: usize, to: usize, path: Vec<NodeId>) {
        self.paths.insert((from, to), path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

type PairResult = ((usize, usize), Option<(f64, Vec<NodeId>)>);

fn query_pair<O: DistanceOracle + ?Sized>(
    oracle: &O,
    nodes: &[NodeId],
    i: usize,
    j: usize,
) -> PairResult {
    match oracle.distance_and_path(nodes[i], nodes[j]) {
        Ok(found) => ((i, j), Some(found)),
        Err(err) => {
            debug!("Locations {} -> {} unreachable: {}", i, j, err);
            ((i, j), None)
        }
    }
}

fn ordered_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|(i, j)| i != j)
        .collect()
}

fn assemble(n: usize, results: Vec<PairResult>) -> (DistanceMatrix, PathCache) {
    let mut matrix = DistanceMatrix::new(n);
    let mut cache = PathCache::default();
    for ((i, j), found) in results {
        if let Some((meters, path)) = found {
            matrix.set(i, j, meters);
            cache.insert(i, j, path);
        }
    }

    info!(
        "Distance matrix computed for {} locations ({} unreachable pairs)",
        n,
        matrix.unreachable_pairs()
    );
    (matrix, cache)
}

/// Queries the oracle once per ordered pair of distinct indices.
///
/// Unreachable pairs become `INFINITY` with no cached path; they never abort
/// the build.
pub fn build<O: DistanceOracle + ?Sized>(
    oracle: &O,
    nodes: &[NodeId],
) -> (DistanceMatrix, PathCache) {
    let results = ordered_pairs(nodes.len())
        .into_iter()
        .map(|(i, j)| query_pair(oracle, nodes, i, j))
        .collect();
    assemble(nodes.len(), results)
}

/// Same as [`build`], with pairs spread across the rayon pool.
///
/// Workers only read the oracle; results are merged after the parallel phase.
pub fn build_parallel<O: DistanceOracle + Sync + ?Sized>(
    oracle: &O,
    nodes: &[NodeId],
) -> (DistanceMatrix, PathCache) {
    let results = ordered_pairs(nodes.len())
        .into_par_iter()
        .map(|(i, j)| query_pair(oracle, nodes, i, j))
        .collect();
    assemble(nodes.len(), results)
}
