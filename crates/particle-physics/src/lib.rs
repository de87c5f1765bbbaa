//! # Particle Physics Kernel
//!
//! Pure force law for the particle-life chemistry: typed particles attract or
//! repel according to a per-type coefficient, bounce off the arena walls and
//! squash visually with speed. Nothing in this crate owns threads or shared
//! state.

pub mod arena;
pub mod constants;
pub mod forces;
pub mod particle;

pub use arena::*;
pub use constants::*;
pub use forces::*;
pub use particle::*;
