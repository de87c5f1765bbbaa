//! Construction-time errors.
//!
//! A running simulation has no recoverable failures: lookups of a type that
//! is not active are programming errors and panic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// The weight table and the particle store were built over different
    /// type subsets.
    #[error("weight table types {weights} do not match particle store types {particles}")]
    MismatchedTypes { weights: String, particles: String },

    #[error("at least one particle type must be active")]
    NoActiveTypes,

    #[error("invalid simulation parameters: {0}")]
    InvalidParams(&'static str),

    /// `params` describe a different arena or population than the store
    /// was built with.
    #[error("simulation parameter {0} does not match the particle store")]
    ParamsMismatch(&'static str),

    #[error("failed to start the particle worker runtime: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}
