use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use spin_sleep::SpinSleeper;
use tokio::sync::broadcast;
use tracing::{info, warn};

use gridnav_mapping::{LaserHit, Pose};

use crate::blackboard::Blackboard;
use crate::bus::Topic;
use crate::reactive::WheelCommand;
use crate::sim::{Robot, SimConfig, World};

/// One sweep of the scanner and the pose it was taken at.
#[derive(Debug, Clone)]
pub struct Scan {
    pub pose: Pose,
    pub hits: Vec<LaserHit>,
}

/// Decides which readings are fit to be mapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanFilter {
    /// Sweeps with fewer readings are dropped whole.
    pub min_readings: usize,
    /// Readings at or beyond this range are dropped.
    pub max_range: f64,
}

impl Default for ScanFilter {
    fn default() -> Self {
        ScanFilter {
            min_readings: 5,
            max_range: 100.0,
        }
    }
}

impl ScanFilter {
    /// Readings of `scan` to integrate, or `None` if the sweep is too sparse.
    pub fn accept(&self, scan: &Scan) -> Option<Vec<LaserHit>> {
        if scan.hits.len() < self.min_readings {
            return None;
        }
        Some(
            scan.hits
                .iter()
                .filter(|h| h.range < self.max_range)
                .copied()
                .collect(),
        )
    }
}

/// Spawns the thread that steps the simulated robot and publishes scans.
///
/// Wheel commands are picked up from `cmd_rx` between steps; the latest one
/// stays in force until replaced.
pub fn spawn_sensor_thread(
    bb: Blackboard,
    config: SimConfig,
    scan_topic: Topic<Scan>,
    mut cmd_rx: broadcast::Receiver<Arc<WheelCommand>>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("sensor".into())
        .spawn(move || {
            info!("Sensor thread started.");
            let world = World::demo();
            let mut rng = StdRng::from_os_rng();
            let period = Duration::from_secs_f64(1.0 / config.rate_hz.max(1.0));
            let dt = period.as_secs_f64();
            let sleeper = SpinSleeper::new(10_000);
            let mut robot = Robot::new(config);
            let mut cmd = WheelCommand::STOP;

            loop {
                loop {
                    match cmd_rx.try_recv() {
                        Ok(latest) => cmd = *latest,
                        Err(broadcast::error::TryRecvError::Lagged(n)) => {
                            warn!("Sensor command receiver lagged by {} messages.", n);
                        }
                        Err(broadcast::error::TryRecvError::Empty) => break,
                        Err(broadcast::error::TryRecvError::Closed) => {
                            info!("Command channel closed. Sensor thread exiting.");
                            return;
                        }
                    }
                }

                robot.step(&cmd, dt);
                let hits = robot.scan(&world, &mut rng);
                bb.write().pose = robot.pose;
                scan_topic.publish(Scan {
                    pose: robot.pose,
                    hits,
                });

                sleeper.sleep(period);
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(ranges: &[f64]) -> Scan {
        Scan {
            pose: Pose::default(),
            hits: ranges.iter().map(|r| LaserHit::new(*r, 0.0)).collect(),
        }
    }

    #[test]
    fn test_sparse_sweep_is_dropped() {
        let filter = ScanFilter::default();
        assert!(filter.accept(&scan(&[1.0, 2.0, 3.0, 4.0])).is_none());
    }

    #[test]
    fn test_out_of_range_readings_are_dropped() {
        let filter = ScanFilter::default();
        let kept = filter.accept(&scan(&[1.0, 1000.0, 3.0, 100.0, 99.9])).unwrap();
        let ranges: Vec<f64> = kept.iter().map(|h| h.range).collect();
        assert_eq!(ranges, vec![1.0, 3.0, 99.9]);
    }
}
