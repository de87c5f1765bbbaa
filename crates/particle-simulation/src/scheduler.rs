//! Per-particle workers on a fixed tokio runtime
//!
//! Every particle gets one logical worker, spawned as its own task on a
//! multi-threaded runtime with `worker_threads` threads. A task runs its
//! sweep to completion and then sleeps for the tick interval, so a suspended
//! worker never holds a thread. Each worker's period drifts independently:
//! it is due again one tick after its own sweep ended, with no barrier across
//! workers.
//!
//! A particle is written only by its own task, so write sets are disjoint.
//! Reads of other particles are unsynchronized and may be stale.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use particle_physics::{apply_rule, Interaction, ParticleType};
use tokio::runtime::{self, Runtime};
use tokio::task::JoinHandle;

use crate::atomic::AtomicF32;
use crate::{ParticleStore, SimulationError, WeightTable};

/// State shared by the worker tasks and the simulation handle
pub(crate) struct Shared {
    pub(crate) weights: WeightTable,
    pub(crate) store: ParticleStore,
    pub(crate) gravity_well: AtomicF32,
    pub(crate) sweeps: AtomicU64,
}

/// The update loop body for a single particle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Worker {
    /// Position of the particle's type within the active set
    home: usize,
    index: usize,
}

impl Worker {
    /// Worker owning particle `index` of type `ty`
    ///
    /// # Panics
    /// If `ty` is not active in `store` or `index` is out of range.
    pub fn new(store: &ParticleStore, ty: ParticleType, index: usize) -> Self {
        let home = match store.types().index_of(ty) {
            Some(home) => home,
            None => panic!("particle type {ty} is not active in this particle store {}", store.types()),
        };
        assert!(
            index < store.count_per_type(),
            "particle index {index} out of range for {} particles per type",
            store.count_per_type()
        );
        Self { home, index }
    }

    /// One worker per particle in `store`, grouped by type in active order
    pub fn all(store: &ParticleStore) -> Vec<Worker> {
        let count = store.count_per_type();
        (0..store.types().len())
            .flat_map(|home| (0..count).map(move |index| Worker { home, index }))
            .collect()
    }

    /// One tick: apply the rule against every active type in turn, own type
    /// included, writing the particle back after each.
    pub fn sweep(&self, weights: &WeightTable, store: &ParticleStore, gravity_well: f32) {
        debug_assert_eq!(weights.types(), store.types());

        let home = store.buffer_by_index(self.home);
        let mut particle = home.particle(self.index);

        for target in 0..store.types().len() {
            let interaction = Interaction {
                coefficient: weights.get_by_index(self.home, target),
                self_mass: store.mass_by_index(self.home),
                target_mass: store.mass_by_index(target),
                gravity_well,
            };
            let targets = store.buffer_by_index(target);
            particle = apply_rule(&particle, targets.positions(), &interaction, store.arena());
            home.store(self.index, &particle);
        }
    }
}

/// The runtime the workers run on and a handle to every worker task
pub(crate) struct Scheduler {
    runtime: Option<Runtime>,
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub(crate) fn spawn(
        shared: &Arc<Shared>,
        threads: usize,
        tick: Duration,
    ) -> Result<Self, SimulationError> {
        let workers = Worker::all(&shared.store);
        let threads = threads.min(workers.len()).max(1);

        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name_fn(|| {
                static NEXT: AtomicUsize = AtomicUsize::new(0);
                format!("particle-{}", NEXT.fetch_add(1, Ordering::Relaxed))
            })
            .enable_time()
            .build()
            .map_err(SimulationError::WorkerSpawn)?;

        let tasks = workers
            .iter()
            .map(|&worker| runtime.spawn(run_worker(worker, Arc::clone(shared), tick)))
            .collect::<Vec<_>>();

        log::info!(
            "Scheduled {} particle workers on {} threads, tick {:?}",
            tasks.len(),
            threads,
            tick
        );
        Ok(Self {
            runtime: Some(runtime),
            tasks,
        })
    }

    pub(crate) fn is_running(&self) -> bool {
        self.runtime.is_some()
    }

    /// Cancel every worker and shut the runtime down. A sweep in progress
    /// finishes first; nothing runs once this returns.
    pub(crate) fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(runtime) = self.runtime.take() {
            drop(runtime);
        }
    }
}

async fn run_worker(worker: Worker, shared: Arc<Shared>, tick: Duration) {
    log::trace!("worker {}/{} started", worker.home, worker.index);
    loop {
        worker.sweep(&shared.weights, &shared.store, shared.gravity_well.load());
        shared.sweeps.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(tick).await;
    }
}
