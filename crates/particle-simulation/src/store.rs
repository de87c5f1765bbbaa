//! Per-type particle buffers and per-type masses
//!
//! Each active type owns a flat buffer with `STRIDE` lanes per particle.
//! Every lane is its own relaxed atomic: the update loop writes a particle
//! lane by lane, so a concurrent reader can see a particle half way through
//! an update. Bulk commands (`reset_all_positions`, `set_all_masses`,
//! `randomize_all_masses`) are equally non-atomic with respect to running
//! workers.

use glam::Vec2;
use particle_physics::{Arena, Particle, ParticleType, ParticleTypes, DEFAULT_PARTICLE_MASS};
use rand::Rng;

use crate::atomic::AtomicF32;
use crate::random::{random_mass, random_position};

/// Lanes per particle
pub const STRIDE: usize = 8;

const POS_X: usize = 0;
const POS_Y: usize = 1;
const VEL_X: usize = 2;
const VEL_Y: usize = 3;
const SCALE_X: usize = 4;
const SCALE_Y: usize = 5;
const ANCHOR_X: usize = 6;
const ANCHOR_Y: usize = 7;

#[derive(Debug)]
pub struct ParticleStore {
    types: ParticleTypes,
    arena: Arena,
    count_per_type: usize,
    /// One mass per active type
    masses: Vec<AtomicF32>,
    /// One buffer per active type, `count_per_type * STRIDE` lanes each
    buffers: Vec<Vec<AtomicF32>>,
}

impl ParticleStore {
    /// Store over every catalog type
    pub fn build_default(arena: Arena, count_per_type: usize) -> Self {
        Self::build_for_types(ParticleTypes::all(), arena, count_per_type)
    }

    pub fn build_for_types(types: ParticleTypes, arena: Arena, count_per_type: usize) -> Self {
        Self::build_for_types_with(types, arena, count_per_type, &mut rand::rng())
    }

    /// Particles start at rest, uniformly spread over the arena's spawn
    /// rectangle, with the default mass and scale.
    pub fn build_for_types_with<R: Rng>(
        types: ParticleTypes,
        arena: Arena,
        count_per_type: usize,
        rng: &mut R,
    ) -> Self {
        let spawn = arena.spawn_rect();
        let masses = types.iter().map(|_| AtomicF32::new(DEFAULT_PARTICLE_MASS)).collect();
        let buffers = types
            .iter()
            .map(|_| {
                let mut lanes = Vec::with_capacity(count_per_type * STRIDE);
                for _ in 0..count_per_type {
                    let particle = Particle::at_rest(random_position(rng, &spawn));
                    lanes.extend(particle_lanes(&particle).map(AtomicF32::new));
                }
                lanes
            })
            .collect();

        Self {
            types,
            arena,
            count_per_type,
            masses,
            buffers,
        }
    }

    pub fn types(&self) -> &ParticleTypes {
        &self.types
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn count_per_type(&self) -> usize {
        self.count_per_type
    }

    pub fn total_particles(&self) -> usize {
        self.count_per_type * self.types.len()
    }

    /// View of every particle of `ty`
    ///
    /// # Panics
    /// If `ty` is not active.
    pub fn get(&self, ty: ParticleType) -> TypeBuffer<'_> {
        self.buffer_by_index(self.index(ty))
    }

    pub fn particle(&self, ty: ParticleType, index: usize) -> Particle {
        self.get(ty).particle(index)
    }

    /// Overwrite one particle.
    ///
    /// While a simulation is running, only the worker that owns this particle
    /// may call this.
    pub fn store_particle(&self, ty: ParticleType, index: usize, particle: &Particle) {
        self.get(ty).store(index, particle);
    }

    pub fn mass(&self, ty: ParticleType) -> f32 {
        self.masses[self.index(ty)].load()
    }

    pub fn set_mass_for_type(&self, ty: ParticleType, mass: f32) {
        self.masses[self.index(ty)].store(mass);
    }

    pub fn set_all_masses(&self, mass: f32) {
        for cell in &self.masses {
            cell.store(mass);
        }
    }

    /// One fresh draw per type, shared by all of that type's particles
    pub fn randomize_all_masses(&self) {
        self.randomize_all_masses_with(&mut rand::rng());
    }

    pub fn randomize_all_masses_with<R: Rng>(&self, rng: &mut R) {
        for cell in &self.masses {
            cell.store(random_mass(rng));
        }
    }

    /// Scatter every particle over the spawn rectangle and stop it. Scale and
    /// anchor are left for the next tick to recompute.
    pub fn reset_all_positions(&self) {
        self.reset_all_positions_with(&mut rand::rng());
    }

    pub fn reset_all_positions_with<R: Rng>(&self, rng: &mut R) {
        let spawn = self.arena.spawn_rect();
        for lanes in &self.buffers {
            for particle in lanes.chunks_exact(STRIDE) {
                let position = random_position(rng, &spawn);
                particle[POS_X].store(position.x);
                particle[POS_Y].store(position.y);
                particle[VEL_X].store(0.0);
                particle[VEL_Y].store(0.0);
            }
        }
    }

    #[inline]
    pub(crate) fn buffer_by_index(&self, index: usize) -> TypeBuffer<'_> {
        TypeBuffer {
            ty: self.types.as_slice()[index],
            lanes: &self.buffers[index],
        }
    }

    #[inline]
    pub(crate) fn mass_by_index(&self, index: usize) -> f32 {
        self.masses[index].load()
    }

    fn index(&self, ty: ParticleType) -> usize {
        match self.types.index_of(ty) {
            Some(index) => index,
            None => panic!("particle type {ty} is not active in this particle store {}", self.types),
        }
    }
}

/// Borrowed view of one type's particles
#[derive(Clone, Copy)]
pub struct TypeBuffer<'a> {
    ty: ParticleType,
    lanes: &'a [AtomicF32],
}

impl<'a> TypeBuffer<'a> {
    pub fn particle_type(&self) -> ParticleType {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.lanes.len() / STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec2 {
        let lanes = self.slot(index);
        Vec2::new(lanes[POS_X].load(), lanes[POS_Y].load())
    }

    pub fn particle(&self, index: usize) -> Particle {
        let lanes = self.slot(index);
        Particle {
            position: Vec2::new(lanes[POS_X].load(), lanes[POS_Y].load()),
            velocity: Vec2::new(lanes[VEL_X].load(), lanes[VEL_Y].load()),
            scale: Vec2::new(lanes[SCALE_X].load(), lanes[SCALE_Y].load()),
            anchor: Vec2::new(lanes[ANCHOR_X].load(), lanes[ANCHOR_Y].load()),
        }
    }

    /// Positions of every particle, read lazily as the iterator advances
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + 'a {
        let lanes: &'a [AtomicF32] = self.lanes;
        lanes
            .chunks_exact(STRIDE)
            .map(|lanes| Vec2::new(lanes[POS_X].load(), lanes[POS_Y].load()))
    }

    pub fn particles(&self) -> impl Iterator<Item = Particle> + 'a {
        let view = *self;
        (0..view.len()).map(move |index| view.particle(index))
    }

    pub(crate) fn store(&self, index: usize, particle: &Particle) {
        for (cell, value) in self.slot(index).iter().zip(particle_lanes(particle)) {
            cell.store(value);
        }
    }

    fn slot(&self, index: usize) -> &'a [AtomicF32] {
        let lanes: &'a [AtomicF32] = self.lanes;
        &lanes[index * STRIDE..(index + 1) * STRIDE]
    }
}

fn particle_lanes(particle: &Particle) -> [f32; STRIDE] {
    [
        particle.position.x,
        particle.position.y,
        particle.velocity.x,
        particle.velocity.y,
        particle.scale.x,
        particle.scale.y,
        particle.anchor.x,
        particle.anchor.y,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_physics::DEFAULT_PARTICLE_SCALE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store(count: usize) -> ParticleStore {
        let mut rng = StdRng::seed_from_u64(1);
        ParticleStore::build_for_types_with(
            ParticleTypes::new([ParticleType::Yellow, ParticleType::Purple]),
            Arena::new(1200.0, 600.0),
            count,
            &mut rng,
        )
    }

    #[test]
    fn test_build_places_particles_in_spawn_rect_at_rest() {
        let store = store(200);
        let spawn = store.arena().spawn_rect();
        assert_eq!(store.total_particles(), 400);
        for ty in store.types().clone().iter() {
            let buffer = store.get(ty);
            assert_eq!(buffer.len(), 200);
            assert_eq!(buffer.particle_type(), ty);
            for particle in buffer.particles() {
                assert!(spawn.contains(particle.position));
                assert_eq!(particle.velocity, Vec2::ZERO);
                assert_eq!(particle.scale, Vec2::splat(DEFAULT_PARTICLE_SCALE));
            }
            assert_eq!(store.mass(ty), DEFAULT_PARTICLE_MASS);
        }
    }

    #[test]
    fn test_store_and_load_particle() {
        let store = store(3);
        let particle = Particle {
            position: Vec2::new(1.0, 2.0),
            velocity: Vec2::new(3.0, 4.0),
            scale: Vec2::new(5.0, 6.0),
            anchor: Vec2::new(7.0, 8.0),
        };
        store.store_particle(ParticleType::Purple, 2, &particle);
        assert_eq!(store.particle(ParticleType::Purple, 2), particle);
        assert_eq!(store.get(ParticleType::Purple).position(2), Vec2::new(1.0, 2.0));
        assert_ne!(store.particle(ParticleType::Yellow, 2), particle);
    }

    #[test]
    fn test_reset_positions_zeroes_velocity_and_keeps_scale() {
        let store = store(50);
        let moving = Particle {
            position: Vec2::new(5.0, 5.0),
            velocity: Vec2::new(-1.0, 2.0),
            scale: Vec2::new(0.1, 0.2),
            anchor: Vec2::new(1.6, 3.2),
        };
        for i in 0..50 {
            store.store_particle(ParticleType::Yellow, i, &moving);
        }

        store.reset_all_positions_with(&mut StdRng::seed_from_u64(2));

        let spawn = store.arena().spawn_rect();
        for particle in store.get(ParticleType::Yellow).particles() {
            assert!(spawn.contains(particle.position));
            assert_eq!(particle.velocity, Vec2::ZERO);
            assert_eq!(particle.scale, moving.scale);
            assert_eq!(particle.anchor, moving.anchor);
        }
    }

    #[test]
    fn test_mass_is_per_type() {
        let store = store(4);
        store.set_mass_for_type(ParticleType::Purple, 4.5);
        assert_eq!(store.mass(ParticleType::Purple), 4.5);
        assert_eq!(store.mass(ParticleType::Yellow), DEFAULT_PARTICLE_MASS);

        store.set_all_masses(1.25);
        assert_eq!(store.mass(ParticleType::Purple), 1.25);
        assert_eq!(store.mass(ParticleType::Yellow), 1.25);
    }

    #[test]
    fn test_randomize_masses_stays_positive() {
        let store = store(1);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            store.randomize_all_masses_with(&mut rng);
            for ty in [ParticleType::Yellow, ParticleType::Purple] {
                let mass = store.mass(ty);
                assert!(mass > 0.9 && mass < 5.0);
            }
        }
    }

    #[test]
    #[should_panic(expected = "not active")]
    fn test_get_inactive_type_panics() {
        store(1).get(ParticleType::Orange);
    }
}
