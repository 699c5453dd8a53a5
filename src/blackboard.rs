use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use gridnav_mapping::{NavMap, Pose};

/// Everything the sensor, mapping and render flows share.
///
/// The map and its path live behind the same lock: integration and planning
/// take it for writing, rendering for reading, so a search never sees a
/// half-applied scan and a view never sees a half-replaced path.
pub struct State {
    pub nav: NavMap,
    pub pose: Pose,
    pub scans_integrated: u64,
    pub last_scan_ts: Instant,
    pub faults: Vec<String>,
}

impl State {
    pub fn new(nav: NavMap, pose: Pose) -> Self {
        State {
            nav,
            pose,
            scans_integrated: 0,
            last_scan_ts: Instant::now(),
            faults: Vec::new(),
        }
    }
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn new_blackboard(nav: NavMap, pose: Pose) -> Blackboard {
    Arc::new(RwLock::new(State::new(nav, pose)))
}

pub fn current_pose(bb: &Blackboard) -> Pose {
    bb.read().pose
}

pub fn raise_fault(bb: &Blackboard, msg: &str) {
    let mut g = bb.write();
    if !g.faults.iter().any(|s| s == msg) {
        g.faults.push(msg.to_string());
    }
}

pub fn clear_fault(bb: &Blackboard, msg: &str) {
    bb.write().faults.retain(|s| s != msg);
}
