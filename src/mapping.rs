use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::blackboard::{Blackboard, clear_fault, raise_fault};
use crate::bus::Topic;
use crate::reactive::{WheelCommand, avoid};
use crate::sensor::{Scan, ScanFilter};

const SCAN_TIMEOUT_FAULT: &str = "scan timeout";

/// Folds every accepted scan into the shared map and answers it with a wheel
/// command from the reactive avoider.
pub async fn mapping_task(
    bb: Blackboard,
    scan_rx: &mut broadcast::Receiver<Arc<Scan>>,
    cmd_tx: Topic<WheelCommand>,
    filter: ScanFilter,
) -> anyhow::Result<()> {
    info!("Mapping task started.");

    loop {
        let scan = match scan_rx.recv().await {
            Ok(scan) => scan,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("Scan receiver lagged by {} messages in mapping_task.", n);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => {
                error!("Scan channel closed. Mapping task cannot continue.");
                return Err(anyhow::anyhow!("Scan channel closed for mapping task"));
            }
        };

        let Some(hits) = filter.accept(&scan) else {
            debug!(readings = scan.hits.len(), "Dropping sparse scan");
            continue;
        };

        {
            let mut g = bb.write();
            match g.nav.apply_scan(&scan.pose, &hits) {
                Ok(applied) => {
                    g.scans_integrated += 1;
                    g.last_scan_ts = Instant::now();
                    debug!(applied, pose = %scan.pose, "Scan integrated");
                }
                Err(e) => warn!("Rejected scan at {}: {}", scan.pose, e),
            }
        }

        let cmd = avoid(&scan.hits);
        debug!(left = cmd.left, right = cmd.right, "Computed wheel command");
        cmd_tx.publish(cmd);
    }
}

/// Check period for a given timeout; never zero.
fn watchdog_period(timeout: Duration) -> Duration {
    (timeout / 4).max(Duration::from_millis(1))
}

/// Stops the robot when scans stop arriving.
pub async fn watchdog(bb: Blackboard, cmd_tx: Topic<WheelCommand>, timeout: Duration) -> anyhow::Result<()> {
    info!("Watchdog task started.");
    let mut tick = time::interval(watchdog_period(timeout));
    loop {
        tick.tick().await;
        let age = Instant::now() - bb.read().last_scan_ts;
        if age > timeout {
            warn!(?age, "No scan integrated recently! Stopping the robot.");
            cmd_tx.publish(WheelCommand::STOP);
            raise_fault(&bb, SCAN_TIMEOUT_FAULT);
        } else {
            clear_fault(&bb, SCAN_TIMEOUT_FAULT);
        }
    }
}
