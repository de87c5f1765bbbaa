//! Random draws shared by the weight table and the particle store

use glam::Vec2;
use particle_physics::{Rect, MASS_SCALE, NUDGE_FRACTION, RANDOM_WEIGHT_DIVISOR};
use rand::Rng;

/// Uniform weight in `[-2/3, 2/3)`
pub fn random_weight<R: Rng>(rng: &mut R) -> f32 {
    (rng.random::<f32>() - 0.5) / RANDOM_WEIGHT_DIVISOR
}

/// A third of a full weight draw, roughly `±0.222`
pub fn small_random_weight<R: Rng>(rng: &mut R) -> f32 {
    random_weight(rng) * NUDGE_FRACTION
}

/// Positive mass in `(1, 5)`, centered on `MASS_SCALE`
pub fn random_mass<R: Rng>(rng: &mut R) -> f32 {
    MASS_SCALE * (random_weight(rng) + 1.0)
}

/// Uniform point inside `rect`
pub fn random_position<R: Rng>(rng: &mut R, rect: &Rect) -> Vec2 {
    let max = rect.max();
    Vec2::new(
        rng.random_range(rect.min.x..max.x),
        rng.random_range(rect.min.y..max.y),
    )
}
