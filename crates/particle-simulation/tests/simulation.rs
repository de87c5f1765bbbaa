use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use particle_physics::{
    anchor_for, apply_rule, Arena, Interaction, Particle, ParticleType, ParticleTypes, FORCE_SCALE,
    MAX_SCALE, MIN_SCALE,
};
use particle_simulation::{ParticleStore, Simulation, SimulationParams, WeightTable, Worker};

const ATTRACTION: f32 = -0.5;
const MASS: f32 = 2.0;

fn pair() -> ParticleTypes {
    ParticleTypes::new([ParticleType::Yellow, ParticleType::White])
}

/// Two particles, one per type, a distance `separation` apart on the x axis,
/// pulling on each other and ignoring their own type.
fn two_body(separation: f32) -> (WeightTable, ParticleStore) {
    let weights = WeightTable::filled(pair(), 0.0);
    weights.put(ParticleType::Yellow, ParticleType::White, ATTRACTION);
    weights.put(ParticleType::White, ParticleType::Yellow, ATTRACTION);

    let store = ParticleStore::build_for_types(pair(), Arena::new(1600.0, 900.0), 1);
    let left = Vec2::new(800.0 - separation / 2.0, 450.0);
    let right = Vec2::new(800.0 + separation / 2.0, 450.0);
    store.store_particle(ParticleType::Yellow, 0, &Particle::at_rest(left));
    store.store_particle(ParticleType::White, 0, &Particle::at_rest(right));
    (weights, store)
}

/// Velocity picked up from rest in the cross-type pass:
/// `FORCE_SCALE * coefficient * m² / d² * (self - other)`.
fn expected_velocity(this: Vec2, other: Vec2) -> Vec2 {
    let d = this - other;
    d * (ATTRACTION * MASS * MASS / d.length_squared()) * FORCE_SCALE
}

fn wait_for_sweeps(sim: &Simulation, target: u64) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while sim.completed_sweeps() < target && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(sim.completed_sweeps() >= target, "simulation made no progress");
}

#[test]
fn test_one_tick_pulls_particles_together_with_closed_form_velocity() {
    let (weights, store) = two_body(100.0);
    let yellow_start = store.particle(ParticleType::Yellow, 0).position;
    let white_start = store.particle(ParticleType::White, 0).position;

    Worker::new(&store, ParticleType::Yellow, 0).sweep(&weights, &store, 1000.0);
    let yellow = store.particle(ParticleType::Yellow, 0);
    let expected = expected_velocity(yellow_start, white_start);
    assert!(yellow.velocity.x > 0.0, "yellow should move toward white");
    assert!((yellow.velocity - expected).length() < 1e-6);
    assert!((yellow.position - (yellow_start + expected)).length() < 1e-3);

    Worker::new(&store, ParticleType::White, 0).sweep(&weights, &store, 1000.0);
    let white = store.particle(ParticleType::White, 0);
    // White's own-type pass comes second and damps the pull once more.
    let pull = expected_velocity(white_start, yellow.position);
    let expected = pull * FORCE_SCALE;
    assert!(white.velocity.x < 0.0, "white should move toward yellow");
    assert!((white.velocity - expected).length() < 1e-6);
    assert!((white.position - (white_start + pull + expected)).length() < 1e-3);
    assert_eq!(white.velocity.y, 0.0);
}

#[test]
fn test_no_force_beyond_gravity_well() {
    let (weights, store) = two_body(300.0);
    Worker::new(&store, ParticleType::Yellow, 0).sweep(&weights, &store, 250.0);
    assert_eq!(store.particle(ParticleType::Yellow, 0).velocity, Vec2::ZERO);
}

#[test]
fn test_many_ticks_stay_bounded() {
    let (weights, store) = two_body(100.0);
    let workers = [
        Worker::new(&store, ParticleType::Yellow, 0),
        Worker::new(&store, ParticleType::White, 0),
    ];
    let arena = *store.arena();
    // A sweep ends on a pass whose bounce used the anchor of the pass before,
    // which is never smaller than the anchor of the fastest sprite.
    let lower = arena.min() + 2.0 * anchor_for(Vec2::splat(MIN_SCALE));

    for _ in 0..10_000 {
        for worker in &workers {
            worker.sweep(&weights, &store, 1000.0);
        }
        for ty in [ParticleType::Yellow, ParticleType::White] {
            let p = store.particle(ty, 0);
            assert!(p.velocity.is_finite(), "{ty} velocity diverged: {:?}", p.velocity);
            assert!(p.position.cmpge(lower).all(), "{ty} below {lower:?}: {:?}", p.position);
            assert!(p.position.cmple(arena.max()).all(), "{ty} above the wall: {:?}", p.position);
            assert!(p.scale.cmpge(Vec2::splat(MIN_SCALE)).all());
            assert!(p.scale.cmple(Vec2::splat(MAX_SCALE)).all());
        }
    }
}

/// Each pass of a sweep bounces off `min + 2 * anchor`, with the anchor the
/// particle carried into that pass.
fn assert_passes_stay_within_walls(weights: &WeightTable, store: &ParticleStore, ticks: usize) {
    let arena = *store.arena();
    let types: Vec<ParticleType> = store.types().iter().collect();
    for _ in 0..ticks {
        for &home in &types {
            for index in 0..store.count_per_type() {
                for &target in &types {
                    let before = store.particle(home, index);
                    let interaction = Interaction {
                        coefficient: weights.get(home, target),
                        self_mass: store.mass(home),
                        target_mass: store.mass(target),
                        gravity_well: 1000.0,
                    };
                    let after = apply_rule(&before, store.get(target).positions(), &interaction, &arena);
                    let lower = arena.min() + 2.0 * before.anchor;
                    assert!(after.position.cmpge(lower).all(), "{:?} below {lower:?}", after.position);
                    assert!(after.position.cmple(arena.max()).all(), "{:?} above {:?}", after.position, arena.max());
                    store.store_particle(home, index, &after);
                }
            }
        }
    }
}

#[test]
fn test_every_pass_respects_anchor_adjusted_walls() {
    let (weights, store) = two_body(100.0);
    assert_passes_stay_within_walls(&weights, &store, 5_000);
}

#[test]
fn test_smallest_valid_arena_keeps_particles_between_walls() {
    let params = SimulationParams::default()
        .with_arena(15.0, 15.0)
        .with_count_per_type(3)
        .with_types(pair());
    assert!(params.validate().is_ok());

    let weights = WeightTable::filled(pair(), -ATTRACTION);
    let store = ParticleStore::build_for_types(pair(), params.arena(), params.count_per_type);
    // Spawned particles start outside the anchor-adjusted bound this close to
    // the wall; one pass brings them in.
    for worker in [ParticleType::Yellow, ParticleType::White]
        .into_iter()
        .flat_map(|ty| (0..3).map(move |index| (ty, index)))
        .map(|(ty, index)| Worker::new(&store, ty, index))
    {
        worker.sweep(&weights, &store, 1000.0);
    }
    assert_passes_stay_within_walls(&weights, &store, 500);
}

#[test]
fn test_running_simulation_keeps_particles_in_arena() {
    let params = SimulationParams::default()
        .with_arena(500.0, 400.0)
        .with_count_per_type(20)
        .with_update_hz(500.0)
        .with_worker_threads(4);
    let sim = Simulation::from_params(params).unwrap();
    let total = sim.store().total_particles() as u64;

    wait_for_sweeps(&sim, total * 20);
    sim.randomize_weights();
    sim.nudge_weights();
    sim.randomize_masses();
    sim.set_gravity_well(800.0);
    wait_for_sweeps(&sim, total * 40);

    let arena = *sim.store().arena();
    for p in sim.snapshot() {
        let position = Vec2::from_array(p.position);
        assert!(position.cmpge(arena.min()).all(), "{position:?} escaped low");
        assert!(position.cmple(arena.max()).all(), "{position:?} escaped high");
        assert!(Vec2::from_array(p.velocity).is_finite());
        for scale in p.scale {
            assert!((MIN_SCALE..=MAX_SCALE).contains(&scale));
        }
    }
    sim.shutdown();
}

#[test]
fn test_reset_positions_while_running() {
    let params = SimulationParams::default()
        .with_arena(600.0, 600.0)
        .with_count_per_type(10)
        .with_update_hz(500.0)
        .with_worker_threads(2);
    let sim = Simulation::from_params(params).unwrap();
    let total = sim.store().total_particles() as u64;
    wait_for_sweeps(&sim, total * 5);

    sim.reset_positions();
    wait_for_sweeps(&sim, sim.completed_sweeps() + total * 5);

    let arena = *sim.store().arena();
    for p in sim.snapshot() {
        let position = Vec2::from_array(p.position);
        assert!(position.cmpge(arena.min()).all() && position.cmple(arena.max()).all());
        assert!(Vec2::from_array(p.velocity).is_finite());
    }
    sim.shutdown();
}

#[test]
fn test_reset_positions_on_idle_store() {
    let (weights, store) = two_body(100.0);
    for _ in 0..50 {
        Worker::new(&store, ParticleType::Yellow, 0).sweep(&weights, &store, 1000.0);
        Worker::new(&store, ParticleType::White, 0).sweep(&weights, &store, 1000.0);
    }
    let scales: Vec<Vec2> = [ParticleType::Yellow, ParticleType::White]
        .into_iter()
        .map(|ty| store.particle(ty, 0).scale)
        .collect();

    store.reset_all_positions();

    let spawn = store.arena().spawn_rect();
    for (ty, scale) in [ParticleType::Yellow, ParticleType::White].into_iter().zip(scales) {
        let p = store.particle(ty, 0);
        assert!(spawn.contains(p.position), "{ty} reset to {:?}", p.position);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.scale, scale);
    }
}

#[test]
fn test_dropping_simulation_stops_workers() {
    let params = SimulationParams::default()
        .with_count_per_type(5)
        .with_update_hz(1000.0)
        .with_worker_threads(3);
    let sim = Simulation::from_params(params).unwrap();
    wait_for_sweeps(&sim, 50);
    drop(sim);
}
