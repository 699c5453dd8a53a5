use macroquad::prelude::*;
use tracing::{info, warn};

use gridnav_mapping::{MapConfig, Pose, View, ViewCell};

use crate::blackboard::{Blackboard, current_pose};

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "gridnav".to_string(),
        window_width: 820,
        window_height: 880,
        high_dpi: true,
        ..Default::default()
    }
}

const MARGIN: f32 = 10.0;
const STATUS_HEIGHT: f32 = 60.0;

/// Grey level for a belief: 250 for free/unknown down to 0 for certain.
fn cell_color(cell: &ViewCell) -> Color {
    if cell.on_path {
        return RED;
    }
    let v = (250.0 - 2.5 * cell.belief as f32) / 255.0;
    Color::new(v, v, v, 1.0)
}

/// World point under the screen position `(sx, sy)`, if it falls on the view.
fn screen_to_world(
    sx: f32,
    sy: f32,
    center: &Pose,
    config: &MapConfig,
    cell_px: f32,
) -> Option<(f64, f64)> {
    let size = config.view_size;
    let col = ((sx - MARGIN) / cell_px).floor();
    let row_from_top = ((sy - MARGIN) / cell_px).floor();
    if col < 0.0 || row_from_top < 0.0 || col >= size as f32 || row_from_top >= size as f32 {
        return None;
    }
    let row = size - 1 - row_from_top as usize;
    let half = (size / 2) as f64;
    Some((
        center.x + config.cell_size * (col as f64 - half),
        center.y + config.cell_size * (row as f64 - half),
    ))
}

fn draw_view(view: &View, cell_px: f32) {
    let size = view.size();
    for row in 0..size {
        // North up: the last row is drawn at the top.
        let y = MARGIN + (size - 1 - row) as f32 * cell_px;
        for col in 0..size {
            if let Some(cell) = view.get(row, col) {
                let x = MARGIN + col as f32 * cell_px;
                draw_rectangle(x, y, cell_px, cell_px, cell_color(cell));
            }
        }
    }
}

fn draw_robot(pose: &Pose, size: usize, cell_px: f32) {
    let c = MARGIN + (size / 2) as f32 * cell_px + cell_px / 2.0;
    let th = -pose.theta as f32;
    let r = cell_px * 0.8;
    let tip = Vec2::new(c + r * th.cos(), c + r * th.sin());
    let p2 = Vec2::new(
        c + r * (th + 2.0 * std::f32::consts::PI / 3.0).cos(),
        c + r * (th + 2.0 * std::f32::consts::PI / 3.0).sin(),
    );
    let p3 = Vec2::new(
        c + r * (th - 2.0 * std::f32::consts::PI / 3.0).cos(),
        c + r * (th - 2.0 * std::f32::consts::PI / 3.0).sin(),
    );
    draw_triangle(tip, p2, p3, BLUE);
}

/// Renders the window around the robot every frame; a left click plans a path
/// from the robot to the clicked cell.
pub async fn run_visualization_loop(bb: Blackboard) {
    info!("Visualization loop starting inside graphics module...");

    loop {
        let (view, config, scans, faults) = {
            let g = bb.read();
            let view = g.nav.view(&g.pose);
            (view, *g.nav.config(), g.scans_integrated, g.faults.clone())
        };

        clear_background(LIGHTGRAY);

        let view = match view {
            Ok(view) => view,
            Err(e) => {
                warn!("Cannot render view: {}", e);
                next_frame().await;
                continue;
            }
        };

        let size = view.size();
        let cell_px = ((screen_width().min(screen_height() - STATUS_HEIGHT) - 2.0 * MARGIN)
            / size as f32)
            .max(1.0);

        draw_view(&view, cell_px);
        draw_robot(view.center(), size, cell_px);

        if is_mouse_button_pressed(MouseButton::Left) {
            let (mx, my) = mouse_position();
            let pose = current_pose(&bb);
            if let Some((gx, gy)) = screen_to_world(mx, my, view.center(), &config, cell_px) {
                match bb.write().nav.find_path(pose.x, pose.y, gx, gy) {
                    Ok(result) => info!(goal_x = gx, goal_y = gy, %result, "Planned from click"),
                    Err(e) => warn!("Planning request rejected: {}", e),
                }
            }
        }

        if is_key_pressed(KeyCode::C) {
            bb.write().nav.reset();
        }

        let text_y = MARGIN + size as f32 * cell_px + 20.0;
        let c = view.center();
        draw_text(
            &format!("Robot: x={:.2} y={:.2} th={:.2}   scans: {}", c.x, c.y, c.theta, scans),
            MARGIN,
            text_y,
            20.0,
            BLACK,
        );
        let status = if faults.is_empty() {
            format!("path cells in view: {}   (click to plan, C to clear)", view.path_cells())
        } else {
            format!("FAULTS: {}", faults.join(", "))
        };
        draw_text(&status, MARGIN, text_y + 22.0, 20.0, BLACK);

        next_frame().await
    }
}
