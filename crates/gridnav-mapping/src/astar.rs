//! A* search over the implicit 4-connected cell lattice.
//!
//! The lattice is unbounded in storage but the search never generates a cell
//! outside `MapConfig::extent`. Cells whose belief exceeds
//! `MapConfig::obstacle_threshold` are discovered but never expanded.
//!
//! Open-set ties (equal `f = g + h`) are resolved first-in, first-out: every
//! push carries a sequence number and the older entry pops first.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use crate::config::MapConfig;
use crate::grid::{GridKey, OccupancyGrid};

/// Represents the result of an A* pathfinding operation with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Cells from the one after the start up to and including the goal.
    /// Empty when no path exists or when start and goal coincide.
    pub path: Vec<GridKey>,
    /// Whether the goal was reached.
    pub found: bool,
    /// The total cost of the path (m), if one was found.
    pub cost: Option<f64>,
    /// The number of cells popped from the open set.
    pub nodes_expanded: usize,
}

impl PathResult {
    /// Creates a new PathResult for a successful path.
    pub fn success(path: Vec<GridKey>, cost: f64, nodes_expanded: usize) -> Self {
        Self {
            path,
            found: true,
            cost: Some(cost),
            nodes_expanded,
        }
    }

    /// Creates a new PathResult for a failed path search.
    pub fn failure(nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            found: false,
            cost: None,
            nodes_expanded,
        }
    }

    /// Returns true if the goal was reached.
    pub fn is_success(&self) -> bool {
        self.found
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cost {
            Some(cost) => write!(
                f,
                "PathResult {{ success: true, path_length: {}, cost: {:.2}, nodes_expanded: {} }}",
                self.path.len(),
                cost,
                self.nodes_expanded
            ),
            None => write!(
                f,
                "PathResult {{ success: false, nodes_expanded: {} }}",
                self.nodes_expanded
            ),
        }
    }
}

/// Open-set entry. `Ord` is reversed so `BinaryHeap` pops the lowest `f`.
#[derive(Copy, Clone, Debug)]
struct State {
    f: f64,
    seq: u64,
    key: GridKey,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

/// Euclidean distance between cell centres, in meters.
fn heuristic(config: &MapConfig, from: GridKey, goal: GridKey) -> f64 {
    from.distance(goal) * config.cell_size
}

/// Walks the predecessor links back from `goal`, stopping before `start`.
fn reconstruct_path(
    came_from: &HashMap<GridKey, GridKey>,
    start: GridKey,
    goal: GridKey,
) -> Vec<GridKey> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(&previous) => current = previous,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Finds a path from `start` to `goal` over `grid`.
///
/// A neighbour is marked seen, and gets its cost and predecessor recorded, the
/// first time it is generated; it is never reconsidered. Neighbours with a
/// belief above the obstacle threshold are recorded but not queued.
///
/// # Returns
/// * `PathResult` - `found == false` with an empty path when the open set runs
///   dry; `found == true` with an empty path when `start == goal`.
pub fn plan(grid: &OccupancyGrid, config: &MapConfig, start: GridKey, goal: GridKey) -> PathResult {
    let mut nodes_expanded = 0;
    let mut seq: u64 = 0;

    let mut open_set = BinaryHeap::new();
    let mut seen: HashSet<GridKey> = HashSet::new();
    let mut came_from: HashMap<GridKey, GridKey> = HashMap::new();
    let mut g_score: HashMap<GridKey, f64> = HashMap::new();

    seen.insert(start);
    g_score.insert(start, 0.0);
    open_set.push(State {
        f: heuristic(config, start, goal),
        seq,
        key: start,
    });

    while let Some(State { key: current, .. }) = open_set.pop() {
        nodes_expanded += 1;

        if current == goal {
            let path = reconstruct_path(&came_from, start, goal);
            let cost = g_score.get(&goal).copied().unwrap_or(0.0);
            return PathResult::success(path, cost, nodes_expanded);
        }

        let current_g = g_score.get(&current).copied().unwrap_or(0.0);

        for neighbor in current.neighbors() {
            if !config.in_extent(neighbor) || !seen.insert(neighbor) {
                continue;
            }

            let g = current_g + config.cell_size;
            came_from.insert(neighbor, current);
            g_score.insert(neighbor, g);

            if grid.get(neighbor) > config.obstacle_threshold {
                continue;
            }

            seq += 1;
            open_set.push(State {
                f: g + heuristic(config, neighbor, goal),
                seq,
                key: neighbor,
            });
        }
    }

    PathResult::failure(nodes_expanded)
}
