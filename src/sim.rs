//! Simulated robot, world and range sensor standing in for real hardware.

use nalgebra::Vector2;
use rand::Rng;
use serde::Deserialize;

use gridnav_mapping::{LaserHit, Pose};

use crate::reactive::WheelCommand;

/// Range reported by a beam that sees nothing, well past any sane sensor limit.
pub const NO_RETURN: f64 = 1000.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Sensor/physics rate (Hz).
    pub rate_hz: f64,
    /// Number of beams, spread evenly from -90° to +90°.
    pub beams: usize,
    /// Farthest return the sensor reports (m).
    pub max_range: f64,
    /// Half-width of the uniform range noise (m).
    pub noise: f64,
    /// Distance between the wheels (m).
    pub wheel_base: f64,
    /// Initial pose `[x, y, theta]`.
    pub start: [f64; 3],
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            rate_hz: 10.0,
            beams: 7,
            max_range: 8.0,
            noise: 0.02,
            wheel_base: 0.5,
            start: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment {
    pub fn new(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Segment {
            a: Vector2::new(ax, ay),
            b: Vector2::new(bx, by),
        }
    }

    /// Distance along the ray `origin + t * dir` to this segment, if it is hit.
    pub fn intersect(&self, origin: &Vector2<f64>, dir: &Vector2<f64>) -> Option<f64> {
        let edge = self.b - self.a;
        let denom = cross(dir, &edge);
        if denom.abs() < 1e-12 {
            return None;
        }
        let to_a = self.a - origin;
        let t = cross(&to_a, &edge) / denom;
        let u = cross(&to_a, dir) / denom;
        (t >= 0.0 && (0.0..=1.0).contains(&u)).then_some(t)
    }
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Static set of walls.
#[derive(Debug, Clone, Default)]
pub struct World {
    walls: Vec<Segment>,
}

impl World {
    pub fn new(walls: Vec<Segment>) -> Self {
        World { walls }
    }

    /// A 16 m square room with a few interior walls.
    pub fn demo() -> Self {
        World::new(vec![
            Segment::new(-8.0, -8.0, 8.0, -8.0),
            Segment::new(8.0, -8.0, 8.0, 8.0),
            Segment::new(8.0, 8.0, -8.0, 8.0),
            Segment::new(-8.0, 8.0, -8.0, -8.0),
            Segment::new(3.0, -8.0, 3.0, 2.0),
            Segment::new(-4.0, 4.0, 4.0, 4.0),
            Segment::new(-4.0, -3.0, -4.0, 4.0),
        ])
    }

    /// Nearest wall along `bearing` from `(x, y)`, or `None` if nothing is hit.
    pub fn cast(&self, x: f64, y: f64, bearing: f64) -> Option<f64> {
        let origin = Vector2::new(x, y);
        let dir = Vector2::new(bearing.cos(), bearing.sin());
        self.walls
            .iter()
            .filter_map(|w| w.intersect(&origin, &dir))
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Differential-drive robot carrying a planar range scanner.
pub struct Robot {
    pub pose: Pose,
    config: SimConfig,
}

impl Robot {
    pub fn new(config: SimConfig) -> Self {
        let [x, y, theta] = config.start;
        Robot {
            pose: Pose::new(x, y, theta),
            config,
        }
    }

    /// Advances the pose by `dt` seconds under the given wheel speeds (m/s).
    pub fn step(&mut self, cmd: &WheelCommand, dt: f64) {
        let v = (cmd.left + cmd.right) / 2.0;
        let omega = (cmd.right - cmd.left) / self.config.wheel_base;
        let theta = self.pose.theta;
        self.pose = Pose::new(
            self.pose.x + v * theta.cos() * dt,
            self.pose.y + v * theta.sin() * dt,
            normalize_angle(theta + omega * dt),
        );
    }

    /// One sweep of the scanner, beams ordered from right (-90°) to left (+90°).
    pub fn scan<R: Rng>(&self, world: &World, rng: &mut R) -> Vec<LaserHit> {
        let n = self.config.beams.max(1);
        (0..n)
            .map(|i| {
                let angle = if n == 1 {
                    0.0
                } else {
                    -std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * i as f64 / (n - 1) as f64
                };
                let range = match world.cast(self.pose.x, self.pose.y, self.pose.theta + angle) {
                    Some(r) if r <= self.config.max_range => {
                        let jitter = if self.config.noise > 0.0 {
                            rng.random_range(-self.config.noise..=self.config.noise)
                        } else {
                            0.0
                        };
                        (r + jitter).max(0.0)
                    }
                    _ => NO_RETURN,
                };
                LaserHit::new(range, angle)
            })
            .collect()
    }
}

/// Normalize an angle to be within `[-PI, PI)`.
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let a = angle % (2.0 * PI);
    if a >= PI {
        a - 2.0 * PI
    } else if a < -PI {
        a + 2.0 * PI
    } else {
        a
    }
}
