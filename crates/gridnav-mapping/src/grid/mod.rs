//! Grid-related functionality for mapping.
//!
//! This module provides the discrete cell key used by every component and the
//! sparse belief store built on top of it.

pub mod key;
pub mod occupancy;

pub use key::GridKey;
pub use occupancy::{MAX_BELIEF, MIN_BELIEF, OccupancyGrid};
