//! Discrete cell keys and the world → cell mapping.

#![warn(missing_docs)]

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of one square cell of the unbounded grid.
///
/// Cell `(ix, iy)` covers the world points that round to it, i.e. it is centred
/// on `(ix * cell_size, iy * cell_size)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridKey {
    /// Cell index along x.
    pub ix: i32,
    /// Cell index along y.
    pub iy: i32,
}

impl GridKey {
    /// Construct a key from cell indices.
    pub const fn new(ix: i32, iy: i32) -> Self {
        GridKey { ix, iy }
    }

    /// Key of the cell containing the world point `(x, y)`.
    ///
    /// Each axis is `round(c / cell_size)` with halves rounded away from zero.
    /// The conversion saturates at the `i32` range; non-finite input must be
    /// rejected before it gets here.
    pub fn from_world(x: f64, y: f64, cell_size: f64) -> Self {
        GridKey {
            ix: (x / cell_size).round() as i32,
            iy: (y / cell_size).round() as i32,
        }
    }

    /// World coordinates of the cell centre.
    pub fn to_world(self, cell_size: f64) -> (f64, f64) {
        (self.ix as f64 * cell_size, self.iy as f64 * cell_size)
    }

    /// The four lattice neighbours, in `+y, -y, +x, -x` order.
    pub fn neighbors(self) -> [GridKey; 4] {
        let GridKey { ix, iy } = self;
        [
            GridKey::new(ix, iy.saturating_add(1)),
            GridKey::new(ix, iy.saturating_sub(1)),
            GridKey::new(ix.saturating_add(1), iy),
            GridKey::new(ix.saturating_sub(1), iy),
        ]
    }

    /// Euclidean distance between cell centres, in cells.
    pub fn distance(self, other: GridKey) -> f64 {
        let dx = other.ix as f64 - self.ix as f64;
        let dy = other.iy as f64 - self.iy as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.ix, self.iy)
    }
}
