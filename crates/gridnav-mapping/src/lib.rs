#![warn(missing_docs)]
#![doc = "Occupancy-belief mapping and A* planning for a mobile robot's local navigation stack."]
#![doc = ""]
#![doc = "Range readings are ray-marched into a sparse grid of saturating beliefs, paths are"]
#![doc = "planned over the implicit cell lattice on demand, and pose-centred windows of belief"]
#![doc = "and path are extracted for display."]

pub mod astar;
pub mod config;
pub mod error;
pub mod grid;
pub mod integrate;
pub mod navmap;
pub mod types;
pub mod view;

pub use astar::PathResult;
pub use config::MapConfig;
pub use error::MappingError;
pub use grid::{GridKey, OccupancyGrid};
pub use integrate::HitUpdate;
pub use navmap::NavMap;
pub use types::{LaserHit, Pose};
pub use view::{View, ViewCell};
