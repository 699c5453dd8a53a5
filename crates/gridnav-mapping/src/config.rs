//! Tunable constants of the belief map and the planner.

use crate::error::MappingError;
use crate::grid::GridKey;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default edge length of one grid cell (m).
pub const CELL_SIZE: f64 = 0.25;
/// Default side of the square view window, in cells.
pub const VIEW_SIZE: usize = 41;
/// Default ray-march step (m).
pub const RAY_STEP: f64 = 0.1;
/// Belief change applied to every cell a beam passes through.
pub const FREE_DELTA: i32 = -2;
/// Belief change applied to the cell a beam ends in.
pub const HIT_DELTA: i32 = 5;
/// Cells with a belief above this value are impassable for the planner.
pub const OBSTACLE_THRESHOLD: u8 = 10;
/// Planner search bound: `|ix| <= MAP_EXTENT` and `|iy| <= MAP_EXTENT`.
pub const MAP_EXTENT: i32 = 100;

/// Map, integration and planning parameters shared by every component.
///
/// All components convert world coordinates through [`MapConfig::key`] so that
/// mapping and planning agree on cell boundaries.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Edge length of one cell (m).
    pub cell_size: f64,
    /// Side of the square view window, in cells. Must be odd.
    pub view_size: usize,
    /// Ray-march step (m).
    pub ray_step: f64,
    /// Belief change for traversed cells.
    pub free_delta: i32,
    /// Belief change for the endpoint cell.
    pub hit_delta: i32,
    /// Beliefs above this are impassable.
    pub obstacle_threshold: u8,
    /// Planner bound on `|ix|` and `|iy|`.
    pub extent: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            cell_size: CELL_SIZE,
            view_size: VIEW_SIZE,
            ray_step: RAY_STEP,
            free_delta: FREE_DELTA,
            hit_delta: HIT_DELTA,
            obstacle_threshold: OBSTACLE_THRESHOLD,
            extent: MAP_EXTENT,
        }
    }
}

impl MapConfig {
    /// Checks that the configuration describes a usable map.
    pub fn validate(&self) -> Result<(), MappingError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(MappingError::InvalidConfig("cell size must be positive"));
        }
        if !(self.ray_step.is_finite() && self.ray_step > 0.0) {
            return Err(MappingError::InvalidConfig("ray step must be positive"));
        }
        if self.view_size == 0 || self.view_size % 2 == 0 {
            return Err(MappingError::InvalidConfig(
                "view size must be a positive odd number",
            ));
        }
        if self.extent < 0 {
            return Err(MappingError::InvalidConfig("extent must be non-negative"));
        }
        Ok(())
    }

    /// Key of the cell containing the world point `(x, y)`.
    #[inline]
    pub fn key(&self, x: f64, y: f64) -> GridKey {
        GridKey::from_world(x, y, self.cell_size)
    }

    /// Whether `key` lies inside the planner's search bound.
    #[inline]
    pub fn in_extent(&self, key: GridKey) -> bool {
        let extent = self.extent.unsigned_abs();
        key.ix.unsigned_abs() <= extent && key.iy.unsigned_abs() <= extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.view_size, 41);
        assert_eq!(config.cell_size, 0.25);
    }

    #[test]
    fn test_extent_bounds_saturated_keys() {
        let config = MapConfig::default();
        assert!(config.in_extent(GridKey::new(-100, 100)));
        assert!(!config.in_extent(GridKey::new(-101, 0)));
        assert!(!config.in_extent(GridKey::new(i32::MIN, 0)));
        assert!(!config.in_extent(GridKey::new(0, i32::MIN)));
        assert!(!config.in_extent(config.key(-1.0e12, 0.0)));
    }

    #[test]
    fn test_invalid_configs() {
        let bad_cell = MapConfig { cell_size: 0.0, ..MapConfig::default() };
        assert!(matches!(bad_cell.validate(), Err(MappingError::InvalidConfig(_))));

        let bad_step = MapConfig { ray_step: f64::NAN, ..MapConfig::default() };
        assert!(bad_step.validate().is_err());

        let even_view = MapConfig { view_size: 40, ..MapConfig::default() };
        assert!(even_view.validate().is_err());

        let negative_extent = MapConfig { extent: -1, ..MapConfig::default() };
        assert!(negative_extent.validate().is_err());
    }

    #[test]
    fn test_extent() {
        let config = MapConfig::default();
        assert!(config.in_extent(GridKey::new(100, -100)));
        assert!(!config.in_extent(GridKey::new(101, 0)));
        assert!(!config.in_extent(GridKey::new(0, -101)));
    }
}
