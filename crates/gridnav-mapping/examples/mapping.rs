use gridnav_mapping::{LaserHit, MapConfig, NavMap, Pose};

/// Range to a square room of half-width `half` centred on the origin.
fn room_range(pose: &Pose, bearing: f64, half: f64) -> f64 {
    let (dx, dy) = (bearing.cos(), bearing.sin());
    let tx = if dx.abs() > 1e-9 { (half.copysign(dx) - pose.x) / dx } else { f64::INFINITY };
    let ty = if dy.abs() > 1e-9 { (half.copysign(dy) - pose.y) / dy } else { f64::INFINITY };
    tx.min(ty)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = MapConfig {
        view_size: 31,
        ..MapConfig::default()
    };
    let mut nav = NavMap::new(config)?;

    // Spin in place at a few spots and sweep a 36-beam scanner.
    let spots = [Pose::new(0.0, 0.0, 0.0), Pose::new(1.0, 1.0, 0.3), Pose::new(-1.5, 0.5, 1.1)];
    for pose in &spots {
        for _ in 0..4 {
            let hits: Vec<LaserHit> = (0..36)
                .map(|i| {
                    let angle = i as f64 * std::f64::consts::TAU / 36.0;
                    LaserHit::new(room_range(pose, pose.theta + angle, 3.0), angle)
                })
                .collect();
            nav.apply_scan(pose, &hits)?;
        }
    }
    let occupied = nav
        .grid()
        .iter()
        .filter(|(_, belief)| *belief > nav.config().obstacle_threshold)
        .count();
    println!("Observed cells: {} ({} occupied)", nav.grid().len(), occupied);

    let view = nav.view(&Pose::default())?;
    for row in (0..view.size()).rev() {
        for col in 0..view.size() {
            let belief = view.get(row, col).map(|c| c.belief).unwrap_or(0);
            let glyph = match belief {
                0 => '.',
                1..=10 => '+',
                _ => '#',
            };
            print!("{}", glyph);
        }
        println!();
    }

    Ok(())
}
