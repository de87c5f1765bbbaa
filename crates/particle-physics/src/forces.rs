//! The particle-life rule: pairwise force, damped integration, wall bounce
//! and speed-driven sprite scale.
//!
//! The force on a particle from a target at displacement `d = self - target`
//! is `coefficient * m_self * m_target / |d|² * d`. Note the displacement
//! points away from the target, so a negative coefficient attracts and a
//! positive one repels.

use glam::Vec2;

use crate::arena::Arena;
use crate::constants::*;
use crate::particle::{anchor_for, Particle};

/// Everything about a (self type, target type) pair that the rule needs
/// besides positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    /// Weight-table entry for (self type, target type)
    pub coefficient: f32,
    pub self_mass: f32,
    pub target_mass: f32,
    /// Cutoff radius; targets at or beyond it are ignored
    pub gravity_well: f32,
}

/// Sum the force exerted on a particle at `position` by every target.
///
/// Targets at distance 0 (the particle itself, or an exact overlap) and at
/// or beyond the gravity well contribute nothing.
pub fn accumulate_force<I>(position: Vec2, targets: I, interaction: &Interaction) -> Vec2
where
    I: IntoIterator<Item = Vec2>,
{
    let strength = interaction.coefficient * interaction.self_mass * interaction.target_mass;
    let mut force = Vec2::ZERO;
    for target in targets {
        let displacement = position - target;
        let distance = displacement.length();
        if distance > 0.0 && distance < interaction.gravity_well {
            force += displacement * (strength / (distance * distance));
        }
    }
    force
}

/// Integrate one axis and bounce it off the walls.
///
/// The lower bound is pushed in by twice the current anchor so the sprite
/// does not clip into the wall. Returns `(position, velocity)`.
pub fn integrate_axis(
    position: f32,
    velocity: f32,
    force: f32,
    anchor: f32,
    min: f32,
    max: f32,
) -> (f32, f32) {
    let mut velocity = (velocity + force) * FORCE_SCALE;
    let mut position = position + velocity;

    let lower = min + anchor * 2.0;
    if position < lower {
        position = lower;
        velocity = -velocity;
    } else if position > max {
        position = max;
        velocity = -velocity;
    }

    (position, velocity)
}

/// Map a speed onto a sprite scale: `MAX_SCALE` at rest, falling linearly to
/// `MIN_SCALE` at `MAX_SCALE_VEL` and staying there.
pub fn normalize_scale(speed: f32) -> f32 {
    let speed = speed.abs().min(MAX_SCALE_VEL);
    MAX_SCALE - (speed / MAX_SCALE_VEL) * (MAX_SCALE - MIN_SCALE)
}

/// Apply the rule for one target collection and return the particle's next
/// state.
pub fn apply_rule<I>(
    particle: &Particle,
    targets: I,
    interaction: &Interaction,
    arena: &Arena,
) -> Particle
where
    I: IntoIterator<Item = Vec2>,
{
    let force = accumulate_force(particle.position, targets, interaction);
    let (min, max) = (arena.min(), arena.max());

    let (x, vel_x) = integrate_axis(
        particle.position.x,
        particle.velocity.x,
        force.x,
        particle.anchor.x,
        min.x,
        max.x,
    );
    let (y, vel_y) = integrate_axis(
        particle.position.y,
        particle.velocity.y,
        force.y,
        particle.anchor.y,
        min.y,
        max.y,
    );

    // Cross-coupled on purpose: vertical motion squashes horizontally.
    let scale = Vec2::new(normalize_scale(vel_y), normalize_scale(vel_x));

    Particle {
        position: Vec2::new(x, y),
        velocity: Vec2::new(vel_x, vel_y),
        scale,
        anchor: anchor_for(scale),
    }
}
