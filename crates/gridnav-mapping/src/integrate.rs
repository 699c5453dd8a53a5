//! Integration of single range readings into the belief grid.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::MapConfig;
use crate::grid::{GridKey, OccupancyGrid};
use crate::types::{LaserHit, Pose};

/// What one integrated reading did to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitUpdate {
    /// Distinct cells that received free-space evidence.
    pub freed: usize,
    /// Cell that received the obstacle evidence.
    pub endpoint: GridKey,
}

/// Cells crossed by the beam short of its return, deduplicated.
///
/// The beam is sampled every `config.ray_step` from the pose outwards while the
/// sample lies closer than `hit.range - config.cell_size`.
pub fn traversed_cells(config: &MapConfig, pose: &Pose, hit: &LaserHit) -> BTreeSet<GridKey> {
    let limit = hit.range - config.cell_size;
    let mut cells = BTreeSet::new();

    let mut step: u32 = 0;
    loop {
        let ds = step as f64 * config.ray_step;
        if ds >= limit {
            break;
        }
        let (x, y) = hit.point_at(pose, ds);
        cells.insert(config.key(x, y));
        step += 1;
    }

    cells
}

/// Applies one reading taken at `pose` to `grid`.
///
/// Every traversed cell is lowered by `config.free_delta` first, then the cell
/// at exactly `hit.range` is raised by `config.hit_delta`. A cell that is both
/// traversed and the endpoint therefore ends with a net positive change.
///
/// Inputs are expected to be finite and already filtered for sensor range.
pub fn integrate_hit(
    grid: &mut OccupancyGrid,
    config: &MapConfig,
    pose: &Pose,
    hit: &LaserHit,
) -> HitUpdate {
    let cells = traversed_cells(config, pose, hit);
    for cell in &cells {
        grid.increment(*cell, config.free_delta);
    }

    let (hx, hy) = hit.point_at(pose, hit.range);
    let endpoint = config.key(hx, hy);
    let belief = grid.increment(endpoint, config.hit_delta);

    trace!(%endpoint, belief, freed = cells.len(), "integrated hit");

    HitUpdate {
        freed: cells.len(),
        endpoint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversed_cells_along_x() {
        let config = MapConfig::default();
        let cells = traversed_cells(&config, &Pose::default(), &LaserHit::new(2.0, 0.0));
        let expected: BTreeSet<GridKey> = (0..=7).map(|ix| GridKey::new(ix, 0)).collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_short_range_traverses_nothing() {
        let config = MapConfig::default();
        let cells = traversed_cells(&config, &Pose::default(), &LaserHit::new(0.2, 0.0));
        assert!(cells.is_empty());
    }

    #[test]
    fn test_hit_raises_endpoint_and_clears_ray() {
        let config = MapConfig::default();
        let mut grid = OccupancyGrid::new();
        for ix in 0..=8 {
            grid.increment(GridKey::new(ix, 0), 20);
        }

        let update = integrate_hit(&mut grid, &config, &Pose::default(), &LaserHit::new(2.0, 0.0));

        assert_eq!(update.endpoint, GridKey::new(8, 0));
        assert_eq!(update.freed, 8);
        assert_eq!(grid.get(GridKey::new(8, 0)), 25);
        for ix in 0..=7 {
            assert_eq!(grid.get(GridKey::new(ix, 0)), 18, "cell {} should be cleared", ix);
        }
    }

    #[test]
    fn test_free_evidence_clamps_at_zero() {
        let config = MapConfig::default();
        let mut grid = OccupancyGrid::new();
        integrate_hit(&mut grid, &config, &Pose::default(), &LaserHit::new(2.0, 0.0));
        assert_eq!(grid.get(GridKey::new(3, 0)), 0);
        assert_eq!(grid.get(GridKey::new(8, 0)), 5);
    }

    #[test]
    fn test_endpoint_inside_ray_nets_positive() {
        // On a coarse diagonal the last free samples and the return share a cell.
        let config = MapConfig { cell_size: 1.0, ..MapConfig::default() };
        let pose = Pose::new(0.0, 0.0, core::f64::consts::FRAC_PI_4);
        let hit = LaserHit::new(2.0, 0.0);
        let shared = GridKey::new(1, 1);
        assert!(traversed_cells(&config, &pose, &hit).contains(&shared));

        let mut grid = OccupancyGrid::new();
        grid.increment(shared, 10);
        let update = integrate_hit(&mut grid, &config, &pose, &hit);
        assert_eq!(update.endpoint, shared);
        assert_eq!(grid.get(shared), 13);
    }

    #[test]
    fn test_heading_and_beam_angle_compose() {
        let config = MapConfig::default();
        let mut grid = OccupancyGrid::new();
        let pose = Pose::new(1.0, 1.0, core::f64::consts::FRAC_PI_2);
        let hit = LaserHit::new(1.0, -core::f64::consts::FRAC_PI_2);
        let update = integrate_hit(&mut grid, &config, &pose, &hit);
        // Beam points along +x from (1, 1): ends at (2, 1).
        assert_eq!(update.endpoint, GridKey::new(8, 4));
        assert_eq!(grid.get(GridKey::new(8, 4)), 5);
    }
}
