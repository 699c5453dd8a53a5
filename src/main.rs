mod blackboard; // brings `blackboard.rs` in as `crate::blackboard`
mod bus; // brings `bus.rs` in as `crate::bus`
mod graphics; // brings `graphics.rs` in as `crate::graphics`
mod mapping; // scan integration and watchdog tasks
mod reactive; // obstacle avoidance
mod sensor; // simulated sensor thread and scan filtering
mod settings; // startup configuration
mod sim; // simulated world and robot

use blackboard::{Blackboard, new_blackboard};
use bus::Topic;
use graphics::window_conf;
use reactive::WheelCommand;
use sensor::Scan;

use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gridnav_mapping::{NavMap, Pose};

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("gridnav started. Setting up Tokio runtime and spawning the mapping stack...");

    let app_config = match settings::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Cannot start without a valid configuration: {}", e);
            return;
        }
    };

    let nav = match NavMap::new(app_config.map) {
        Ok(nav) => nav,
        Err(e) => {
            error!("Invalid map configuration: {}", e);
            return;
        }
    };
    let [x, y, theta] = app_config.sim.start;
    let bb = new_blackboard(nav, Pose::new(x, y, theta));

    let tokio_rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to build Tokio runtime: {}", e);
            return;
        }
    };

    let sim_bb = bb.clone();
    tokio_rt.spawn(async move {
        info!("Mapping stack started.");
        match run(sim_bb, app_config).await {
            Ok(_) => info!("Mapping stack finished successfully."),
            Err(e) => error!("Mapping stack failed: {:?}. Rendering continues on the last map.", e),
        }
    });

    graphics::run_visualization_loop(bb).await;
}

async fn run(bb: Blackboard, app_config: settings::AppConfig) -> anyhow::Result<()> {
    let scan_topic: Topic<Scan> = Topic::new(16);
    let cmd_topic: Topic<WheelCommand> = Topic::new(4);

    let mut scan_rx = scan_topic.subscribe();
    let cmd_rx = cmd_topic.subscribe();

    info!("Spawning sensor thread...");
    sensor::spawn_sensor_thread(bb.clone(), app_config.sim.clone(), scan_topic, cmd_rx)?;

    let timeout = Duration::from_millis(app_config.watchdog_ms.unwrap_or(500));

    tokio::try_join!(
        mapping::mapping_task(bb.clone(), &mut scan_rx, cmd_topic.clone(), app_config.scan.clone()),
        mapping::watchdog(bb.clone(), cmd_topic.clone(), timeout),
        plan_initial_goal(bb.clone(), app_config.goal),
    )?;
    Ok(())
}

/// Plans once towards the configured goal after the map has a few scans in it.
async fn plan_initial_goal(bb: Blackboard, goal: Option<[f64; 2]>) -> anyhow::Result<()> {
    let Some([gx, gy]) = goal else {
        return Ok(());
    };

    let mut tick = tokio::time::interval(Duration::from_millis(100));
    loop {
        let ready = bb.read().scans_integrated >= 10;
        if ready {
            break;
        }
        tick.tick().await;
    }

    let result = {
        let mut g = bb.write();
        let pose = g.pose;
        g.nav.find_path(pose.x, pose.y, gx, gy)?
    };
    if result.found {
        info!(%result, "Initial goal planned");
    } else {
        warn!(goal_x = gx, goal_y = gy, "Initial goal unreachable on current map");
    }
    Ok(())
}
