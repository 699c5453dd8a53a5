//! This module defines the error types used by the `gridnav-mapping` crate.

#![warn(missing_docs)]

use thiserror::Error;

/// Error type for mapping and planning operations.
///
/// Absent cells, saturated beliefs and unreachable goals are all normal
/// outcomes and are never reported through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// Error for malformed numeric input.
    /// This variant is returned when a pose, range reading or planning
    /// coordinate is NaN or infinite.
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),
    /// Error for an unusable map configuration.
    /// This variant is returned when a cell size or ray step is not positive,
    /// or when the view size is not a positive odd number.
    #[error("Invalid map configuration: {0}")]
    InvalidConfig(&'static str),
}
