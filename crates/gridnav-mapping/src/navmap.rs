//! The owned mapping context.
//!
//! `NavMap` bundles the belief grid, the current path and the configuration so
//! that every operation states what it reads and writes. It carries no locks;
//! share it behind an `RwLock` when several threads integrate, plan and render.

use tracing::{debug, info, warn};

use crate::astar::{PathResult, plan};
use crate::config::MapConfig;
use crate::error::MappingError;
use crate::grid::{GridKey, OccupancyGrid};
use crate::integrate::{HitUpdate, integrate_hit};
use crate::types::{LaserHit, Pose};
use crate::view::{View, extract_view};

/// Belief grid plus the most recently planned path.
#[derive(Debug, Clone, Default)]
pub struct NavMap {
    config: MapConfig,
    grid: OccupancyGrid,
    path: Vec<GridKey>,
}

impl NavMap {
    /// Creates an empty map with the given configuration.
    ///
    /// # Errors
    /// * `MappingError::InvalidConfig` - if `config` fails validation.
    pub fn new(config: MapConfig) -> Result<Self, MappingError> {
        config.validate()?;
        Ok(NavMap {
            config,
            grid: OccupancyGrid::new(),
            path: Vec::new(),
        })
    }

    /// The configuration this map was built with.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Read access to the belief grid.
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// The current path, empty if none has been planned or the last plan failed.
    pub fn path(&self) -> &[GridKey] {
        &self.path
    }

    /// Key of the cell containing `(x, y)`.
    pub fn key(&self, x: f64, y: f64) -> GridKey {
        self.config.key(x, y)
    }

    /// Belief of the cell containing `(x, y)`.
    pub fn belief_at(&self, x: f64, y: f64) -> u8 {
        self.grid.get(self.key(x, y))
    }

    /// Integrates one range reading taken at `pose`.
    ///
    /// # Errors
    /// * `MappingError::InvalidInput` - if the pose or reading is not finite;
    ///   the grid is left untouched.
    pub fn apply_hit(&mut self, pose: &Pose, hit: &LaserHit) -> Result<HitUpdate, MappingError> {
        pose.validate()?;
        hit.validate()?;
        let update = integrate_hit(&mut self.grid, &self.config, pose, hit);
        debug!(%pose, %hit, endpoint = %update.endpoint, freed = update.freed, "applied hit");
        Ok(update)
    }

    /// Integrates every reading of one scan taken at `pose`, in order.
    ///
    /// All readings are validated before any is applied.
    pub fn apply_scan(&mut self, pose: &Pose, hits: &[LaserHit]) -> Result<usize, MappingError> {
        pose.validate()?;
        for hit in hits {
            hit.validate()?;
        }
        for hit in hits {
            integrate_hit(&mut self.grid, &self.config, pose, hit);
        }
        debug!(%pose, hits = hits.len(), cells = self.grid.len(), "applied scan");
        Ok(hits.len())
    }

    /// Plans from world point `(x0, y0)` to `(x1, y1)` and stores the result.
    ///
    /// On success the stored path is replaced; on failure it is cleared. A
    /// failed search is a normal outcome reported through `PathResult::found`.
    ///
    /// # Errors
    /// * `MappingError::InvalidInput` - if any coordinate is not finite; the
    ///   stored path is left untouched.
    pub fn find_path(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<PathResult, MappingError> {
        if ![x0, y0, x1, y1].iter().all(|c| c.is_finite()) {
            return Err(MappingError::InvalidInput("planning coordinates must be finite"));
        }

        let start = self.key(x0, y0);
        let goal = self.key(x1, y1);
        debug!(%start, %goal, "finding path");

        let result = plan(&self.grid, &self.config, start, goal);
        if result.found {
            info!(
                length = result.path.len(),
                nodes_expanded = result.nodes_expanded,
                "path found"
            );
            self.path = result.path.clone();
        } else {
            warn!(%start, %goal, nodes_expanded = result.nodes_expanded, "no path found");
            self.path.clear();
        }
        Ok(result)
    }

    /// Drops the stored path.
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Forgets every observation and the stored path, keeping the config.
    pub fn reset(&mut self) {
        info!(cells = self.grid.len(), "Resetting map");
        self.grid.clear();
        self.path.clear();
    }

    /// Snapshot of the window around `center` with the stored path overlaid.
    ///
    /// # Errors
    /// * `MappingError::InvalidInput` - if `center` is not finite.
    pub fn view(&self, center: &Pose) -> Result<View, MappingError> {
        center.validate()?;
        Ok(extract_view(&self.grid, &self.path, &self.config, center))
    }
}
