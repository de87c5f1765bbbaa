//! Particle Life
//!
//! Headless driver: runs the simulation, polls snapshots at the display rate
//! the way a renderer would, and cycles through the interactive commands.
//!
//! Usage: `particle-life [seconds]` (default 30).

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use particle_physics::ParticleType;
use particle_simulation::{ParticleSnapshot, Simulation, SimulationParams};

const DEFAULT_RUN_SECS: u64 = 30;
const STATS_INTERVAL: Duration = Duration::from_secs(1);
const COMMAND_INTERVAL: Duration = Duration::from_secs(5);

/// Commands cycled through on `COMMAND_INTERVAL`, like a user pressing keys
#[derive(Clone, Copy, Debug)]
enum Command {
    RandomizeWeights,
    NudgeWeights,
    RandomizeMasses,
    ResetMasses,
    WidenGravityWell,
    NarrowGravityWell,
    ResetPositions,
}

impl Command {
    const CYCLE: [Command; 7] = [
        Command::RandomizeWeights,
        Command::NudgeWeights,
        Command::WidenGravityWell,
        Command::RandomizeMasses,
        Command::NarrowGravityWell,
        Command::ResetMasses,
        Command::ResetPositions,
    ];

    fn apply(self, sim: &Simulation) {
        match self {
            Command::RandomizeWeights => sim.randomize_weights(),
            Command::NudgeWeights => sim.nudge_weights(),
            Command::RandomizeMasses => sim.randomize_masses(),
            Command::ResetMasses => sim.reset_masses(),
            Command::WidenGravityWell => sim.set_gravity_well(sim.gravity_well() + 100.0),
            Command::NarrowGravityWell => sim.set_gravity_well(sim.gravity_well() - 100.0),
            Command::ResetPositions => sim.reset_positions(),
        }
    }
}

/// Per-frame numbers reported in the stats line
struct FrameStats {
    mean_speed: f32,
    fastest: Option<(ParticleType, f32)>,
}

impl FrameStats {
    fn measure(frame: &[ParticleSnapshot]) -> Self {
        let mut total = 0.0;
        let mut fastest: Option<(ParticleType, f32)> = None;
        for p in frame {
            let speed = Vec2::from_array(p.velocity).length();
            total += speed;
            if fastest.map_or(true, |(_, best)| speed > best) {
                fastest = p.get_type().map(|ty| (ty, speed));
            }
        }
        let mean_speed = if frame.is_empty() { 0.0 } else { total / frame.len() as f32 };
        Self { mean_speed, fastest }
    }
}

fn run_secs() -> Duration {
    let secs = std::env::args()
        .nth(1)
        .and_then(|arg| match arg.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(err) => {
                log::warn!("Ignoring run length {arg:?}: {err}");
                None
            }
        })
        .unwrap_or(DEFAULT_RUN_SECS);
    Duration::from_secs(secs)
}

fn main() -> ExitCode {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting particle life...");

    let params = SimulationParams::default();
    let frame_interval = params.display_interval();
    let sim = match Simulation::from_params(params) {
        Ok(sim) => sim,
        Err(err) => {
            log::error!("Failed to start simulation: {err}");
            return ExitCode::FAILURE;
        }
    };

    for ty in sim.types().iter() {
        let [r, g, b] = ty.color();
        log::info!("  {ty:<7} #{r:02x}{g:02x}{b:02x} row {:?}", sim.weights().row(ty));
    }

    let run_for = run_secs();
    let started = Instant::now();
    let mut frame = Vec::with_capacity(sim.store().total_particles());
    let mut frames = 0u32;
    let mut last_stats = started;
    let mut last_sweeps = 0;
    let mut last_command = started;
    let mut commands = Command::CYCLE.iter().copied().cycle();

    while started.elapsed() < run_for {
        let frame_start = Instant::now();
        sim.snapshot_into(&mut frame);
        frames += 1;

        if last_stats.elapsed() >= STATS_INTERVAL {
            let elapsed = last_stats.elapsed().as_secs_f64();
            let sweeps = sim.completed_sweeps();
            let stats = FrameStats::measure(&frame);
            log::info!(
                "{:.0} fps, {:.0} sweeps/s, mean speed {:.3}, gravity well {:.0}",
                frames as f64 / elapsed,
                (sweeps - last_sweeps) as f64 / elapsed,
                stats.mean_speed,
                sim.gravity_well()
            );
            if let Some((ty, speed)) = stats.fastest {
                log::debug!("fastest particle: {ty} at {speed:.3}");
            }
            frames = 0;
            last_sweeps = sweeps;
            last_stats = Instant::now();
        }

        if last_command.elapsed() >= COMMAND_INTERVAL {
            if let Some(command) = commands.next() {
                log::info!("Command: {command:?}");
                command.apply(&sim);
            }
            last_command = Instant::now();
        }

        if let Some(rest) = frame_interval.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    sim.shutdown();
    log::info!("Done");
    ExitCode::SUCCESS
}
