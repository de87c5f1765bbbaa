//! Tuning constants for the particle-life force law
//!
//! These are fixed at compile time. Only the gravity well and the weight
//! matrix are live parameters.

/// Damping / time-step factor applied when force is folded into velocity
pub const FORCE_SCALE: f32 = 0.4;

/// Sprite scale for a particle at rest
pub const MAX_SCALE: f32 = 0.27;

/// Sprite scale for a particle at or above `MAX_SCALE_VEL`
pub const MIN_SCALE: f32 = 0.09;

/// Speed at which the scale bottoms out at `MIN_SCALE`
pub const MAX_SCALE_VEL: f32 = 0.6;

/// Edge length of the particle sprite in pixels
pub const BITMAP_SIZE: f32 = 32.0;

/// Gap between the arena edge and the wall
pub const WALL_BUFFER: f32 = 1.0;

/// Wall thickness
pub const WALL_THICKNESS: f32 = 2.0;

/// Smallest arena width or height in which the anchor-adjusted lower bound
/// of the largest sprite still lies below the upper bound
pub const MIN_ARENA_EXTENT: f32 = 2.0 * (WALL_BUFFER + WALL_THICKNESS) + BITMAP_SIZE * MAX_SCALE;

/// Scale given to freshly spawned particles
pub const DEFAULT_PARTICLE_SCALE: f32 = 0.125;

/// Mass every type starts with (and returns to on reset)
pub const DEFAULT_PARTICLE_MASS: f32 = 2.0;

/// Cutoff radius used when nothing else is configured
pub const DEFAULT_GRAVITY_WELL: f32 = 210.0;

/// Range the live gravity well is clamped to
pub const GRAVITY_WELL_RANGE: std::ops::RangeInclusive<f32> = 10.0..=1000.0;

/// Divisor turning `U(0,1) - 0.5` into a weight in `[-2/3, 2/3)`
pub const RANDOM_WEIGHT_DIVISOR: f32 = 0.75;

/// Fraction of a full weight draw used by a nudge
pub const NUDGE_FRACTION: f32 = 1.0 / 3.0;

/// Multiplier of the mass distribution `MASS_SCALE * (weight + 1)`
pub const MASS_SCALE: f32 = 3.0;
