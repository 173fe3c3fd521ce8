//! Exact traveling salesman solver (bitmask dynamic programming).
//!
//! Location 0 is the depot: the tour starts and ends there and visits every
//! other index exactly once. Runs in O(n^2 * 2^n) time, so callers must bound
//! `n` before solving.

use tracing::debug;

/// Largest instance the solver accepts. The memo table holds
/// `2^(n-1) * n` entries.
pub const MAX_EXACT_LOCATIONS: usize = 20;

const NO_NEXT: u8 = u8::MAX;

#[derive(Debug, Clone, PartialEq)]
pub struct TspSolution {
    /// Total closed-tour distance; `INFINITY` if no feasible tour exists.
    pub cost: f64,
    /// Location indices, starting and ending at 0, length `n + 1`.
    pub tour: Vec<usize>,
}

impl TspSolution {
    pub fn is_feasible(&self) -> bool {
        self.cost.is_finite()
    }
}

/// Finds the minimum-cost closed tour over locations `0..n`.
///
/// `dp[mask][last]` is the cheapest way to visit every location outside
/// `mask` starting at `last` and then return to 0. `mask` always contains 0,
/// so the table is indexed by `mask >> 1`.
///
/// Ties resolve to the lowest next index. Infinite distances propagate: an
/// infeasible instance still yields a complete tour with `cost == INFINITY`.
///
/// # Panics
///
/// Panics if `n > MAX_EXACT_LOCATIONS`.
pub fn solve<F>(n: usize, distance: F) -> TspSolution
where
    F: Fn(usize, usize) -> f64,
{
    assert!(
        n <= MAX_EXACT_LOCATIONS,
        "exact solver supports at most {} locations, got {}",
        MAX_EXACT_LOCATIONS,
        n
    );

    match n {
        0 => {
            return TspSolution {
                cost: 0.0,
                tour: Vec::new(),
            };
        }
        1 => {
            return TspSolution {
                cost: 0.0,
                tour: vec![0, 0],
            };
        }
        _ => {}
    }

    let full = (1usize << n) - 1;
    let slot = |mask: usize, last: usize| (mask >> 1) * n + last;
    let mut cost = vec![f64::INFINITY; (1usize << (n - 1)) * n];
    let mut next = vec![NO_NEXT; cost.len()];

    // Supersets are finished before their subsets because they compare larger.
    for mask in (1..=full).rev().step_by(2) {
        for last in 0..n {
            if mask & (1 << last) == 0 || (last == 0 && mask != 1) {
                continue;
            }

            if mask == full {
                cost[slot(mask, last)] = distance(last, 0);
                continue;
            }

            let mut best = f64::INFINITY;
            let mut best_next = NO_NEXT;
            for candidate in 1..n {
                if mask & (1 << candidate) != 0 {
                    continue;
                }
                let rest = cost[slot(mask | (1 << candidate), candidate)];
                let total = distance(last, candidate) + rest;
                if best_next == NO_NEXT || total < best {
                    best = total;
                    best_next = candidate as u8;
                }
            }

            cost[slot(mask, last)] = best;
            next[slot(mask, last)] = best_next;
        }
    }

    let mut tour = Vec::with_capacity(n + 1);
    tour.push(0);
    let (mut mask, mut last) = (1usize, 0usize);
    while next[slot(mask, last)] != NO_NEXT {
        last = next[slot(mask, last)] as usize;
        mask |= 1 << last;
        tour.push(last);
    }
    tour.push(0);

    let solution = TspSolution {
        cost: cost[slot(1, 0)],
        tour: rotate_to_depot(&tour),
    };
    debug!("Solved {} locations: cost {} tour {:?}", n, solution.cost, solution.tour);
    solution
}

/// Rotates a closed tour so it starts and ends at the depot, keeping cyclic
/// order. A tour that never visits 0 gets the depot prepended.
pub fn rotate_to_depot(tour: &[usize]) -> Vec<usize> {
    let cycle = match tour {
        [] => return Vec::new(),
        [.., last] if tour.len() > 1 && tour[0] == *last => &tour[..tour.len() - 1],
        _ => tour,
    };

    match cycle.iter().position(|&index| index == 0) {
        Some(pos) => {
            let mut rotated: Vec<usize> =
                cycle[pos..].iter().chain(&cycle[..pos]).copied().collect();
            rotated.push(0);
            rotated
        }
        None => std::iter::once(0).chain(tour.iter().copied()).collect(),
    }
}

/// Sums `distance` along consecutive tour indices.
pub fn tour_cost<F>(tour: &[usize], distance: F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    tour.windows(2).map(|leg| distance(leg[0], leg[1])).sum()
}
