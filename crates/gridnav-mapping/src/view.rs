//! Dense, pose-centred snapshots of the belief grid for display.

use std::collections::HashSet;

use crate::config::MapConfig;
use crate::grid::{GridKey, MAX_BELIEF, OccupancyGrid};
use crate::types::Pose;

/// One cell of a [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewCell {
    /// Key of the grid cell sampled here.
    pub key: GridKey,
    /// Belief of that cell.
    pub belief: u8,
    /// Whether the cell is part of the current path.
    pub on_path: bool,
}

impl ViewCell {
    /// Belief scaled to `[0, 1]`.
    pub fn intensity(&self) -> f32 {
        self.belief as f32 / MAX_BELIEF as f32
    }
}

/// Square window of the grid centred on a pose.
///
/// Row index maps to the y offset, column index to the x offset, both spaced by
/// the cell size; the centre row and column sample the pose itself.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    center: Pose,
    size: usize,
    cells: Vec<ViewCell>,
}

impl View {
    /// Side of the window, in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Pose the window was centred on.
    pub fn center(&self) -> &Pose {
        &self.center
    }

    /// Cell at `row` (y offset) and `col` (x offset), or `None` out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&ViewCell> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[ViewCell] {
        &self.cells
    }

    /// Number of cells flagged as part of the path.
    pub fn path_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.on_path).count()
    }
}

/// Samples a `config.view_size`² window of `grid` around `center`, flagging the
/// cells that belong to `path`.
pub fn extract_view(
    grid: &OccupancyGrid,
    path: &[GridKey],
    config: &MapConfig,
    center: &Pose,
) -> View {
    let size = config.view_size;
    let half = (size / 2) as f64;
    let on_path: HashSet<GridKey> = path.iter().copied().collect();

    let mut cells = Vec::with_capacity(size * size);
    for row in 0..size {
        let y = center.y + config.cell_size * (row as f64 - half);
        for col in 0..size {
            let x = center.x + config.cell_size * (col as f64 - half);
            let key = config.key(x, y);
            cells.push(ViewCell {
                key,
                belief: grid.get(key),
                on_path: on_path.contains(&key),
            });
        }
    }

    View {
        center: *center,
        size,
        cells,
    }
}
