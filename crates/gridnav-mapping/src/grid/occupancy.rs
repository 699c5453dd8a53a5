//! Sparse belief storage.
//!
//! Beliefs are bounded saturating counters rather than log-odds: free-space
//! evidence pulls a cell towards [`MIN_BELIEF`], returns push it towards
//! [`MAX_BELIEF`], and neither end ever overflows.

#![warn(missing_docs)]

use std::collections::HashMap;

use super::key::GridKey;

/// Lowest belief a cell can hold; also the value of every unobserved cell.
pub const MIN_BELIEF: u8 = 0;
/// Highest belief a cell can hold.
pub const MAX_BELIEF: u8 = 100;

/// Sparse map from cell key to occupancy belief.
///
/// Unobserved cells are not stored and read as [`MIN_BELIEF`], so unknown space
/// is treated as free.
#[derive(Debug, Clone, Default)]
pub struct OccupancyGrid {
    cells: HashMap<GridKey, u8>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Belief of `key`, or [`MIN_BELIEF`] if the cell was never touched.
    pub fn get(&self, key: GridKey) -> u8 {
        self.cells.get(&key).copied().unwrap_or(MIN_BELIEF)
    }

    /// Adds `delta` to the belief of `key`, saturating at both bounds, and
    /// returns the new belief. The cell is created if absent.
    pub fn increment(&mut self, key: GridKey, delta: i32) -> u8 {
        let cell = self.cells.entry(key).or_insert(MIN_BELIEF);
        let next = (*cell as i32)
            .saturating_add(delta)
            .clamp(MIN_BELIEF as i32, MAX_BELIEF as i32);
        *cell = next as u8;
        *cell
    }

    /// Number of cells that have been observed at least once.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over every observed cell and its belief, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (GridKey, u8)> + '_ {
        self.cells.iter().map(|(key, belief)| (*key, *belief))
    }

    /// Forgets every observation.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
