use gridnav_mapping::{GridKey, LaserHit, MapConfig, NavMap, Pose};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = MapConfig {
        view_size: 21,
        ..MapConfig::default()
    };
    let mut nav = NavMap::new(config)?;

    // A wall at x = 1.0 m from y = -1.5 m to y = 1.5 m, built from zero-range
    // returns so each lands exactly on its cell.
    let obstacles: Vec<(i32, i32)> = (-6..=6).map(|iy| (4, iy)).collect();
    for (ix, iy) in &obstacles {
        let (x, y) = GridKey::new(*ix, *iy).to_world(config.cell_size);
        for _ in 0..3 {
            nav.apply_hit(&Pose::new(x, y, 0.0), &LaserHit::new(0.0, 0.0))?;
        }
    }

    let start = (0.0, 0.0);
    let goal = (2.0, 0.0);
    let center = Pose::new(1.0, 0.0, 0.0);

    println!("Grid:");
    print_view(&nav, &center, start, goal)?;

    let result = nav.find_path(start.0, start.1, goal.0, goal.1)?;
    println!("\n{}", result);

    if result.found {
        println!("\nGrid with path:");
        print_view(&nav, &center, start, goal)?;
    } else {
        println!("\nNo path found.");
    }

    Ok(())
}

fn print_view(
    nav: &NavMap,
    center: &Pose,
    start: (f64, f64),
    goal: (f64, f64),
) -> Result<(), Box<dyn std::error::Error>> {
    let view = nav.view(center)?;
    let start = nav.key(start.0, start.1);
    let goal = nav.key(goal.0, goal.1);

    // Print from top to bottom (reverse y order for visual clarity)
    for row in (0..view.size()).rev() {
        for col in 0..view.size() {
            let Some(cell) = view.get(row, col) else { continue };
            let glyph = if cell.key == start {
                'S'
            } else if cell.key == goal {
                'G'
            } else if cell.on_path {
                '*'
            } else if cell.belief > nav.config().obstacle_threshold {
                'X'
            } else {
                '.'
            };
            print!("{} ", glyph);
        }
        println!();
    }
    Ok(())
}
