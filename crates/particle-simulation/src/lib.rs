//! # Particle Simulation Engine
//!
//! Concurrent CPU driver for the particle-life rule: one logical worker per
//! particle, scheduled on a fixed thread pool, sharing a weight table and a
//! particle store through relaxed per-cell atomics.

mod atomic;
pub mod error;
pub mod params;
pub mod random;
pub mod scheduler;
pub mod simulation;
pub mod store;
pub mod weights;

pub use error::*;
pub use params::*;
pub use scheduler::Worker;
pub use simulation::*;
pub use store::*;
pub use weights::*;
