use glam::DVec2;
use sim_core::geometry::{Circle, Rectangle, Shape};
use sim_core::particle::Particle;
use sim_core::region_tree::{Point, RegionTree};
use sim_core::trail::TrailEntry;
use sim_core::{Config, SimError, Simulation};

fn roomy() -> Config {
    Config {
        world_width: 2000.0,
        world_height: 2000.0,
        ..Config::default()
    }
}

#[test]
fn two_equal_masses_pull_together() {
    let cfg = roomy();
    let a = Particle::at_rest(DVec2::new(1000.0, 1000.0), 100.0, &cfg);
    let b = Particle::at_rest(DVec2::new(1100.0, 1000.0), 100.0, &cfg);
    let mut sim = Simulation::from_particles(cfg, vec![a, b]).unwrap();

    let stats = sim.tick(1.0).unwrap();
    assert_eq!(stats.interactions, 2);
    assert_eq!(stats.wraps, 0);

    let [a, b] = sim.particles() else {
        panic!("expected two particles");
    };
    assert!((a.vel - DVec2::new(0.01, 0.0)).length() < 1e-12, "{:?}", a.vel);
    assert!((b.vel - DVec2::new(-0.01, 0.0)).length() < 1e-12, "{:?}", b.vel);
    assert!((a.pos - DVec2::new(1000.01, 1000.0)).length() < 1e-9);
    assert!((b.pos - DVec2::new(1099.99, 1000.0)).length() < 1e-9);
}

#[test]
fn two_body_pull_from_the_domain_corner() {
    let cfg = roomy();
    let a = Particle::at_rest(DVec2::new(0.0, 0.0), 100.0, &cfg);
    let b = Particle::at_rest(DVec2::new(100.0, 0.0), 100.0, &cfg);
    let mut sim = Simulation::from_particles(cfg, vec![a, b]).unwrap();

    let stats = sim.tick(1.0).unwrap();
    assert_eq!(stats.interactions, 2);
    assert_eq!(stats.wraps, 0);

    let [a, b] = sim.particles() else {
        panic!("expected two particles");
    };
    assert!((a.vel - DVec2::new(0.01, 0.0)).length() < 1e-12, "{:?}", a.vel);
    assert!((b.vel - DVec2::new(-0.01, 0.0)).length() < 1e-12, "{:?}", b.vel);
    assert!((a.pos - DVec2::new(0.01, 0.0)).length() < 1e-12, "{:?}", a.pos);
    assert!((b.pos - DVec2::new(99.99, 0.0)).length() < 1e-12, "{:?}", b.pos);
}

#[test]
fn spawn_wider_than_the_world_still_ticks() {
    let cfg = Config::from_yaml_str(
        "particle_count: 5000\nworld_width: 640\nworld_height: 360\neffective_range: 1.0\nseed: 1\n",
    )
    .unwrap();
    assert!(cfg.spawn_spread > cfg.world_width);
    let mut sim = Simulation::new(cfg).unwrap();

    for _ in 0..3 {
        assert_eq!(sim.tick(1.0).unwrap().inserted, 5000);
    }
    let at_origin = sim.particles().iter().filter(|p| p.pos == DVec2::ZERO).count();
    assert!(at_origin <= 1, "{at_origin} particles piled on the corner");
}

#[test]
fn capacity_one_tree_subdivides_on_second_insert() {
    let mut tree: RegionTree<usize> = RegionTree::new(Rectangle::new(50.0, 50.0, 50.0, 50.0), 1);
    let points = [(10.0, 10.0), (12.0, 11.0), (13.0, 14.0), (11.5, 12.5), (10.5, 13.0)];

    for (i, &(x, y)) in points.iter().enumerate() {
        assert!(tree.insert(Point::new(DVec2::new(x, y), i)));
        if i == 1 {
            assert!(tree.root().is_subdivided());
        }
    }
    assert_eq!(tree.total_count(), 5);

    let everything = Shape::Circle(Circle::new(11.0, 12.0, 10.0));
    let mut ids: Vec<usize> = tree.query(&everything).iter().filter_map(|p| p.payload).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn crossing_the_edge_wraps_and_breaks_the_trail() {
    let cfg = Config {
        world_width: 100.0,
        world_height: 100.0,
        max_path_length: 4,
        ..Config::default()
    };
    let p = Particle::new(DVec2::new(98.0, 50.0), DVec2::new(3.0, 0.0), 100.0, &cfg);
    let mut sim = Simulation::from_particles(cfg, vec![p]).unwrap();

    assert_eq!(sim.tick(1.0).unwrap().wraps, 1);
    let p = &sim.particles()[0];
    assert!((p.pos - DVec2::new(1.0, 50.0)).length() < 1e-9, "{:?}", p.pos);

    let entries: Vec<TrailEntry> = p.trail.iter().copied().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], TrailEntry::Break);
    assert!(matches!(entries[1], TrailEntry::Point(_)));

    for _ in 0..20 {
        sim.tick(1.0).unwrap();
        let p = &sim.particles()[0];
        assert!(p.trail.len() <= 4);
        assert!(sim.world_boundary().contains_point(p.pos));
    }
}

#[test]
fn lone_particle_keeps_its_speed_under_the_cap() {
    let cfg = Config {
        max_speed: 5.0,
        ..roomy()
    };
    let p = Particle::new(DVec2::new(500.0, 500.0), DVec2::new(30.0, 40.0), 100.0, &cfg);
    let mut sim = Simulation::from_particles(cfg, vec![p]).unwrap();

    sim.tick(0.5).unwrap();
    let p = &sim.particles()[0];
    assert!((p.speed() - 5.0).abs() < 1e-9);
    // The step integrates the uncapped velocity, the cap applies afterwards.
    assert!((p.pos - DVec2::new(515.0, 520.0)).length() < 1e-9);
}

#[test]
fn yaml_config_drives_a_simulation() {
    let cfg = Config::from_yaml_str(
        "particle_count: 30\nworld_width: 300\nworld_height: 300\nspawn_spread: 300\nseed: 3\nparallel: true\n",
    )
    .unwrap();
    let mut sim = Simulation::new(cfg).unwrap();
    assert_eq!(sim.particles().len(), 30);

    for _ in 0..5 {
        assert_eq!(sim.tick(1.0).unwrap().inserted, 30);
    }
    assert_eq!(sim.tick_count(), 5);
}

#[test]
fn invalid_yaml_value_is_rejected() {
    let err = Config::from_yaml_str("node_capacity: 0\n").unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "{err}");
}
