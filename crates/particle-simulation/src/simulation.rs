//! Running simulation handle
//!
//! This is the surface a renderer or UI talks to: it starts the worker pool,
//! exposes the live gravity well, forwards the weight/mass/position commands
//! and hands out per-frame snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use particle_physics::{ParticleType, ParticleTypes};

use crate::atomic::AtomicF32;
use crate::params::clamp_gravity_well;
use crate::scheduler::{Scheduler, Shared};
use crate::{ParticleStore, SimulationError, SimulationParams, WeightTable};

/// Render-facing copy of one particle (matches a GPU instance layout)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleSnapshot {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub scale: [f32; 2],
    pub anchor: [f32; 2],
    /// `ParticleType as u32`
    pub particle_type: u32,
}

impl ParticleSnapshot {
    pub fn get_type(&self) -> Option<ParticleType> {
        ParticleType::from_index(self.particle_type)
    }
}

pub struct Simulation {
    shared: Arc<Shared>,
    scheduler: Scheduler,
    params: SimulationParams,
}

impl Simulation {
    /// Build a random weight table and particle store from `params` and
    /// start them.
    pub fn from_params(params: SimulationParams) -> Result<Self, SimulationError> {
        params.validate()?;
        let weights = WeightTable::build_for_types(params.types.clone());
        let store =
            ParticleStore::build_for_types(params.types.clone(), params.arena(), params.count_per_type);
        store.set_all_masses(params.default_mass);
        Self::start(weights, store, params)
    }

    /// Start one worker per particle in `store`.
    ///
    /// The weight table, the store and `params` must agree on the active
    /// types, and the store must have been built with `params`' arena and
    /// population. `params` also supplies the tick rate, pool size, default
    /// mass and initial gravity well.
    pub fn start(
        weights: WeightTable,
        store: ParticleStore,
        params: SimulationParams,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        if weights.types() != store.types() {
            return Err(SimulationError::MismatchedTypes {
                weights: weights.types().to_string(),
                particles: store.types().to_string(),
            });
        }
        if store.types().is_empty() {
            return Err(SimulationError::NoActiveTypes);
        }
        if params.types != *store.types() {
            return Err(SimulationError::MismatchedTypes {
                weights: params.types.to_string(),
                particles: store.types().to_string(),
            });
        }
        if params.arena() != *store.arena() {
            return Err(SimulationError::ParamsMismatch("arena"));
        }
        if params.count_per_type != store.count_per_type() {
            return Err(SimulationError::ParamsMismatch("count_per_type"));
        }

        log::info!(
            "Starting simulation: {} types {}, {} particles each, gravity well {}",
            store.types().len(),
            store.types(),
            store.count_per_type(),
            params.clamped_gravity_well()
        );

        let shared = Arc::new(Shared {
            weights,
            store,
            gravity_well: AtomicF32::new(params.clamped_gravity_well()),
            sweeps: AtomicU64::new(0),
        });
        let scheduler = Scheduler::spawn(&shared, params.worker_threads, params.tick_interval())?;

        Ok(Self {
            shared,
            scheduler,
            params,
        })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn types(&self) -> &ParticleTypes {
        self.shared.store.types()
    }

    pub fn weights(&self) -> &WeightTable {
        &self.shared.weights
    }

    pub fn store(&self) -> &ParticleStore {
        &self.shared.store
    }

    /// Current cutoff radius
    pub fn gravity_well(&self) -> f32 {
        self.shared.gravity_well.load()
    }

    /// Set the cutoff radius, clamped to `[10, 1000]`. Workers pick it up on
    /// their next sweep.
    pub fn set_gravity_well(&self, value: f32) {
        let clamped = clamp_gravity_well(value);
        log::debug!("gravity well -> {clamped}");
        self.shared.gravity_well.store(clamped);
    }

    pub fn randomize_weights(&self) {
        log::debug!("randomizing weights");
        self.shared.weights.randomize_all();
    }

    pub fn nudge_weights(&self) {
        log::debug!("nudging weights");
        self.shared.weights.nudge_all();
    }

    pub fn randomize_masses(&self) {
        log::debug!("randomizing masses");
        self.shared.store.randomize_all_masses();
    }

    /// Every type back to `params.default_mass`
    pub fn reset_masses(&self) {
        log::debug!("resetting masses to {}", self.params.default_mass);
        self.shared.store.set_all_masses(self.params.default_mass);
    }

    pub fn set_mass(&self, ty: ParticleType, mass: f32) {
        log::debug!("mass of {ty} -> {mass}");
        self.shared.store.set_mass_for_type(ty, mass);
    }

    pub fn reset_positions(&self) {
        log::debug!("resetting positions");
        self.shared.store.reset_all_positions();
    }

    /// Sweeps finished by all workers since start
    pub fn completed_sweeps(&self) -> u64 {
        self.shared.sweeps.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Vec<ParticleSnapshot> {
        let mut out = Vec::with_capacity(self.shared.store.total_particles());
        self.snapshot_into(&mut out);
        out
    }

    /// Refill `out` with every particle, grouped by type in active order.
    /// Particles are read while workers run, so a snapshot is not a single
    /// consistent instant.
    pub fn snapshot_into(&self, out: &mut Vec<ParticleSnapshot>) {
        out.clear();
        let store = &self.shared.store;
        for ty in store.types().iter() {
            out.extend(store.get(ty).particles().map(|p| ParticleSnapshot {
                position: p.position.to_array(),
                velocity: p.velocity.to_array(),
                scale: p.scale.to_array(),
                anchor: p.anchor.to_array(),
                particle_type: ty as u32,
            }));
        }
    }

    /// Stop all workers and wait for the pool to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.scheduler.is_running() {
            log::info!(
                "Stopping simulation after {} sweeps",
                self.shared.sweeps.load(Ordering::Relaxed)
            );
        }
        self.scheduler.stop();
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}
