//! Reactive obstacle avoidance from the three forward-facing beams.

use gridnav_mapping::LaserHit;

/// Wheel speeds (m/s) sent to the drive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelCommand {
    pub left: f64,
    pub right: f64,
}

impl WheelCommand {
    pub const STOP: WheelCommand = WheelCommand { left: 0.0, right: 0.0 };
}

/// Readings are clipped to this distance before steering.
const CLIP: f64 = 2.0;
/// Closer than this straight ahead and the robot turns in place.
const BLOCKED: f64 = 1.2;

/// Drive forward, steering towards the more open side, and spin in place when
/// the way ahead is blocked.
///
/// Expects the seven-beam layout, right to left: beam 2 looks 30° right, beam 3
/// straight ahead, beam 4 30° left. Scans with fewer than five beams stop the
/// robot.
pub fn avoid(hits: &[LaserHit]) -> WheelCommand {
    if hits.len() < 5 {
        return WheelCommand::STOP;
    }

    let right = hits[2].range.clamp(0.0, CLIP);
    let ahead = hits[3].range.clamp(0.0, CLIP);
    let left = hits[4].range.clamp(0.0, CLIP);

    let (speed, turn) = if ahead < BLOCKED {
        (0.0, 1.0)
    } else {
        (ahead - 1.0, (right - left).clamp(-1.0, 1.0))
    };

    WheelCommand {
        left: speed + turn,
        right: speed - turn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(right: f64, ahead: f64, left: f64) -> Vec<LaserHit> {
        vec![
            LaserHit::new(5.0, -1.57),
            LaserHit::new(5.0, -1.05),
            LaserHit::new(right, -0.52),
            LaserHit::new(ahead, 0.0),
            LaserHit::new(left, 0.52),
            LaserHit::new(5.0, 1.05),
            LaserHit::new(5.0, 1.57),
        ]
    }

    #[test]
    fn test_open_space_drives_straight() {
        let cmd = avoid(&scan(1000.0, 1000.0, 1000.0));
        assert_eq!(cmd, WheelCommand { left: 1.0, right: 1.0 });
    }

    #[test]
    fn test_blocked_spins_in_place() {
        let cmd = avoid(&scan(3.0, 1.0, 3.0));
        assert_eq!(cmd, WheelCommand { left: 1.0, right: -1.0 });
    }

    #[test]
    fn test_steers_towards_open_side() {
        // More room on the left: right wheel faster.
        let cmd = avoid(&scan(1.5, 2.0, 2.0));
        assert!(cmd.right > cmd.left);
        // More room on the right: left wheel faster.
        let cmd = avoid(&scan(2.0, 2.0, 0.5));
        assert!(cmd.left > cmd.right);
        assert!((cmd.left - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_scan_stops() {
        assert_eq!(avoid(&scan(2.0, 2.0, 2.0)[..4]), WheelCommand::STOP);
    }
}
