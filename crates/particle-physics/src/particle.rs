//! Particle types and per-particle state

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::constants::{BITMAP_SIZE, DEFAULT_PARTICLE_SCALE};

/// Species tag. The catalog is closed; a simulation picks a subset of it at
/// startup and keeps that subset for its whole lifetime.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParticleType {
    Yellow = 0,
    Orange = 1,
    White = 2,
    Red = 3,
    Purple = 4,
}

impl ParticleType {
    /// Every type in catalog order
    pub const ALL: [ParticleType; 5] = [
        ParticleType::Yellow,
        ParticleType::Orange,
        ParticleType::White,
        ParticleType::Red,
        ParticleType::Purple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParticleType::Yellow => "yellow",
            ParticleType::Orange => "orange",
            ParticleType::White => "white",
            ParticleType::Red => "red",
            ParticleType::Purple => "purple",
        }
    }

    /// Display color as sRGB bytes, from the Catppuccin Mocha palette
    pub fn color(self) -> [u8; 3] {
        let colors = &catppuccin::PALETTE.mocha.colors;
        let rgb = match self {
            ParticleType::Yellow => colors.yellow.rgb,
            ParticleType::Orange => colors.peach.rgb,
            ParticleType::White => colors.text.rgb,
            ParticleType::Red => colors.red.rgb,
            ParticleType::Purple => colors.mauve.rgb,
        };
        [rgb.r, rgb.g, rgb.b]
    }

    pub fn from_index(index: u32) -> Option<ParticleType> {
        Self::ALL.get(index as usize).copied()
    }
}

impl std::fmt::Display for ParticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, duplicate-free set of active particle types.
///
/// Types are kept in catalog order regardless of the order they were given
/// in, so two sets built from the same types always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticleTypes {
    types: Vec<ParticleType>,
}

impl ParticleTypes {
    pub fn all() -> Self {
        Self {
            types: ParticleType::ALL.to_vec(),
        }
    }

    pub fn new(types: impl IntoIterator<Item = ParticleType>) -> Self {
        let mut types: Vec<ParticleType> = types.into_iter().collect();
        types.sort();
        types.dedup();
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, ty: ParticleType) -> bool {
        self.index_of(ty).is_some()
    }

    /// Position of `ty` within the active set
    pub fn index_of(&self, ty: ParticleType) -> Option<usize> {
        self.types.binary_search(&ty).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = ParticleType> + '_ {
        self.types.iter().copied()
    }

    pub fn as_slice(&self) -> &[ParticleType] {
        &self.types
    }
}

impl Default for ParticleTypes {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<ParticleType> for ParticleTypes {
    fn from_iter<I: IntoIterator<Item = ParticleType>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl std::fmt::Display for ParticleTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str("]")
    }
}

/// Kinematic and visual state of one particle.
///
/// Mass is deliberately absent: every particle of a type shares that
/// type's mass, which lives with the particle store.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position in arena coordinates
    pub position: Vec2,
    /// Velocity, in arena units per rule application
    pub velocity: Vec2,
    /// Sprite scale (x is driven by vertical speed, y by horizontal speed)
    pub scale: Vec2,
    /// Sprite anchor offset, `BITMAP_SIZE * scale / 2`
    pub anchor: Vec2,
}

impl Particle {
    /// A particle at rest with the default sprite scale
    pub fn at_rest(position: Vec2) -> Self {
        let scale = Vec2::splat(DEFAULT_PARTICLE_SCALE);
        Self {
            position,
            velocity: Vec2::ZERO,
            scale,
            anchor: anchor_for(scale),
        }
    }
}

/// Anchor offset for a sprite drawn at `scale`
pub fn anchor_for(scale: Vec2) -> Vec2 {
    BITMAP_SIZE * scale / 2.0
}
