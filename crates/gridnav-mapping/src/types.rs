//! Sensor-side value types: the robot pose and a single range reading.

#![warn(missing_docs)]

use core::fmt;

use crate::error::MappingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2‑D pose `(x, y, θ)` in meters and radians (θ measured counter‑clockwise
/// from the x‑axis in the world frame).
///
/// Poses are supplied by the sensor side every cycle; the map never owns one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position (m).
    pub x: f64,
    /// World‑frame y position (m).
    pub y: f64,
    /// Heading (rad).
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Rejects poses carrying NaN or infinite components.
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.x.is_finite() && self.y.is_finite() && self.theta.is_finite() {
            Ok(())
        } else {
            Err(MappingError::InvalidInput("pose must be finite"))
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// One range reading: distance to the first return and the beam angle
/// relative to the robot heading.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LaserHit {
    /// Distance to the return (m).
    pub range: f64,
    /// Beam angle relative to the heading (rad).
    pub angle: f64,
}

impl LaserHit {
    /// Construct a new range reading.
    pub const fn new(range: f64, angle: f64) -> Self {
        LaserHit { range, angle }
    }

    /// Rejects readings carrying NaN or infinite components.
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.range.is_finite() && self.angle.is_finite() {
            Ok(())
        } else {
            Err(MappingError::InvalidInput("laser hit must be finite"))
        }
    }

    /// World position of the point `distance` meters along this beam.
    pub fn point_at(&self, pose: &Pose, distance: f64) -> (f64, f64) {
        let bearing = pose.theta + self.angle;
        (
            pose.x + distance * bearing.cos(),
            pose.y + distance * bearing.sin(),
        )
    }
}

impl fmt::Display for LaserHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(r: {:.2} m, α: {:.2} rad)", self.range, self.angle)
    }
}
