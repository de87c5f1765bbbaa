//! Simulation parameters fixed at construction time

use std::time::Duration;

use particle_physics::{
    Arena, ParticleTypes, DEFAULT_GRAVITY_WELL, DEFAULT_PARTICLE_MASS, GRAVITY_WELL_RANGE,
    MIN_ARENA_EXTENT,
};

use crate::SimulationError;

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParams {
    pub arena_width: f32,
    pub arena_height: f32,
    pub count_per_type: usize,
    /// Active subset of the type catalog
    pub types: ParticleTypes,
    /// Sweeps per second per worker
    pub update_hz: f64,
    /// Rate at which a renderer is expected to poll snapshots
    pub display_hz: f64,
    /// Size of the thread pool the per-particle workers share
    pub worker_threads: usize,
    /// Mass every type starts with and `reset_masses` returns to
    pub default_mass: f32,
    /// Initial cutoff radius, clamped to `GRAVITY_WELL_RANGE` on start
    pub gravity_well: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            arena_width: 1600.0,
            arena_height: 900.0,
            count_per_type: 1000,
            types: ParticleTypes::all(),
            update_hz: 40.0,
            display_hz: 60.0,
            worker_threads: 16,
            default_mass: DEFAULT_PARTICLE_MASS,
            gravity_well: DEFAULT_GRAVITY_WELL,
        }
    }
}

impl SimulationParams {
    pub fn with_arena(mut self, width: f32, height: f32) -> Self {
        self.arena_width = width;
        self.arena_height = height;
        self
    }

    pub fn with_count_per_type(mut self, count: usize) -> Self {
        self.count_per_type = count;
        self
    }

    pub fn with_types(mut self, types: ParticleTypes) -> Self {
        self.types = types;
        self
    }

    pub fn with_update_hz(mut self, hz: f64) -> Self {
        self.update_hz = hz;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    pub fn with_gravity_well(mut self, gravity_well: f32) -> Self {
        self.gravity_well = gravity_well;
        self
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Pause between two sweeps of the same worker (25ms at 40Hz)
    pub fn tick_interval(&self) -> Duration {
        interval_for(self.update_hz)
    }

    pub fn display_interval(&self) -> Duration {
        interval_for(self.display_hz)
    }

    /// Gravity well clamped to the live range
    pub fn clamped_gravity_well(&self) -> f32 {
        clamp_gravity_well(self.gravity_well)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.types.is_empty() {
            return Err(SimulationError::NoActiveTypes);
        }
        if !(self.arena_width > MIN_ARENA_EXTENT && self.arena_height > MIN_ARENA_EXTENT) {
            return Err(SimulationError::InvalidParams(
                "arena is too small to fit a particle between its walls",
            ));
        }
        if !(self.update_hz.is_finite() && self.update_hz > 0.0) {
            return Err(SimulationError::InvalidParams("update_hz must be positive"));
        }
        if !(self.display_hz.is_finite() && self.display_hz > 0.0) {
            return Err(SimulationError::InvalidParams("display_hz must be positive"));
        }
        if self.worker_threads == 0 {
            return Err(SimulationError::InvalidParams("worker_threads must be at least 1"));
        }
        if !self.default_mass.is_finite() {
            return Err(SimulationError::InvalidParams("default_mass must be finite"));
        }
        if self.gravity_well.is_nan() {
            return Err(SimulationError::InvalidParams("gravity_well must be a number"));
        }
        Ok(())
    }
}

fn interval_for(hz: f64) -> Duration {
    Duration::from_nanos((1e9 / hz).round() as u64)
}

pub(crate) fn clamp_gravity_well(value: f32) -> f32 {
    value.clamp(*GRAVITY_WELL_RANGE.start(), *GRAVITY_WELL_RANGE.end())
}
