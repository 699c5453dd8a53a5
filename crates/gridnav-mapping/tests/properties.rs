use gridnav_mapping::grid::MAX_BELIEF;
use gridnav_mapping::integrate::traversed_cells;
use gridnav_mapping::{GridKey, LaserHit, MapConfig, NavMap, OccupancyGrid, Pose};
use proptest::prelude::*;

const CELL: f64 = 0.25;

proptest! {
    #[test]
    fn key_is_stable_within_a_cell(
        ix in -1000i32..1000,
        iy in -1000i32..1000,
        ex in -0.124f64..0.124,
        ey in -0.124f64..0.124,
    ) {
        let config = MapConfig::default();
        let (x, y) = GridKey::new(ix, iy).to_world(CELL);
        prop_assert_eq!(config.key(x, y), config.key(x + ex, y + ey));
        prop_assert_eq!(config.key(x, y), GridKey::new(ix, iy));
    }

    #[test]
    fn key_is_deterministic(x in -500.0f64..500.0, y in -500.0f64..500.0) {
        let config = MapConfig::default();
        prop_assert_eq!(config.key(x, y), config.key(x, y));
    }

    #[test]
    fn belief_stays_bounded(deltas in proptest::collection::vec(-300i32..300, 0..64)) {
        let mut grid = OccupancyGrid::new();
        let key = GridKey::new(1, -1);
        for delta in deltas {
            let belief = grid.increment(key, delta);
            prop_assert!(belief <= MAX_BELIEF);
            prop_assert_eq!(belief, grid.get(key));
        }
    }

    #[test]
    fn hit_raises_endpoint_and_lowers_ray(range in 1.0f64..10.0, seeds in 1usize..4) {
        let mut nav = NavMap::new(MapConfig::default()).unwrap();
        let pose = Pose::default();
        let hit = LaserHit::new(range, 0.0);
        let end = nav.key(range, 0.0);

        // A zero-range return lands on the pose cell; use it to seed belief
        // along the beam so that decreases are observable.
        for ix in 0..=end.ix {
            for _ in 0..seeds {
                nav.apply_hit(&Pose::new(ix as f64 * CELL, 0.0, 0.0), &LaserHit::new(0.0, 0.0)).unwrap();
            }
        }

        let ray: Vec<GridKey> = traversed_cells(nav.config(), &pose, &hit)
            .into_iter()
            .filter(|k| *k != GridKey::new(0, 0) && *k != end)
            .collect();
        let before_end = nav.grid().get(end);
        let before: Vec<u8> = ray.iter().map(|k| nav.grid().get(*k)).collect();

        nav.apply_hit(&pose, &hit).unwrap();

        prop_assert!(nav.grid().get(end) > before_end);
        for (key, prior) in ray.iter().zip(before) {
            prop_assert!(nav.grid().get(*key) < prior, "cell {} did not drop", key);
        }
    }

    #[test]
    fn planned_paths_are_simple_and_connected(
        gx in -12i32..12,
        gy in -12i32..12,
        blocked in proptest::collection::vec((-12i32..12, -12i32..12), 0..40),
    ) {
        let config = MapConfig { extent: 12, ..MapConfig::default() };
        let mut nav = NavMap::new(config).unwrap();
        for (bx, by) in blocked {
            if (bx, by) == (0, 0) {
                continue;
            }
            // A zero-range return lands exactly on the target cell.
            let pose = Pose::new(bx as f64 * CELL, by as f64 * CELL, 0.0);
            for _ in 0..3 {
                nav.apply_hit(&pose, &LaserHit::new(0.0, 0.0)).unwrap();
            }
        }

        let goal = GridKey::new(gx, gy);
        let (x1, y1) = goal.to_world(CELL);
        let result = nav.find_path(0.0, 0.0, x1, y1).unwrap();

        if result.found {
            let path = nav.path();
            if goal != GridKey::new(0, 0) {
                prop_assert_eq!(*path.last().unwrap(), goal);
            }
            let mut seen = std::collections::HashSet::new();
            let mut prev = GridKey::new(0, 0);
            for key in path {
                prop_assert!(seen.insert(*key), "path repeats {}", key);
                prop_assert!((prev.distance(*key) - 1.0).abs() < 1e-12);
                prop_assert!(nav.grid().get(*key) <= config.obstacle_threshold);
                prev = *key;
            }
        } else {
            prop_assert!(nav.path().is_empty());
        }
    }
}

#[test]
fn straight_path_has_eight_cells() {
    let mut nav = NavMap::new(MapConfig::default()).unwrap();
    let result = nav.find_path(0.0, 0.0, 2.0, 0.0).unwrap();
    assert!(result.found);
    assert_eq!(nav.path().len(), 8);
    for (i, key) in nav.path().iter().enumerate() {
        assert_eq!(key.ix, i as i32 + 1);
        assert_eq!(key.iy, 0);
    }
}

#[test]
fn self_path_is_empty_but_found() {
    let mut nav = NavMap::new(MapConfig::default()).unwrap();
    let result = nav.find_path(1.0, 1.0, 1.05, 0.95).unwrap();
    assert!(result.found);
    assert!(nav.path().is_empty());
}

#[test]
fn enclosed_start_yields_empty_path() {
    let mut nav = NavMap::new(MapConfig::default()).unwrap();
    for key in GridKey::new(0, 0).neighbors() {
        let (x, y) = key.to_world(CELL);
        for _ in 0..3 {
            nav.apply_hit(&Pose::new(x, y, 0.0), &LaserHit::new(0.0, 0.0)).unwrap();
        }
    }
    let result = nav.find_path(0.0, 0.0, 2.0, 2.0).unwrap();
    assert!(!result.found);
    assert!(nav.path().is_empty());
}

#[test]
fn view_of_unknown_grid_is_blank() {
    let nav = NavMap::new(MapConfig::default()).unwrap();
    let view = nav.view(&Pose::new(-4.0, 7.5, 1.0)).unwrap();
    assert_eq!(view.cells().len(), 41 * 41);
    assert!(view.cells().iter().all(|c| c.belief == 0 && !c.on_path));
}
