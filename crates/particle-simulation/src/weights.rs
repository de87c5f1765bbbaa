//! Per-type-pair force coefficients
//!
//! The table is dense over the active types and read by every worker on
//! every tick. Writes come in bursts from UI commands. Each cell is an
//! independent atomic, so a worker may see a table that is half way through
//! `randomize_all` or `nudge_all`.

use particle_physics::{ParticleType, ParticleTypes};
use rand::Rng;

use crate::atomic::AtomicF32;
use crate::random::{random_weight, small_random_weight};

#[derive(Debug)]
pub struct WeightTable {
    types: ParticleTypes,
    /// Row-major: `cells[from * n + to]`
    cells: Vec<AtomicF32>,
}

impl WeightTable {
    /// Random table over every catalog type
    pub fn build_default() -> Self {
        Self::build_for_types(ParticleTypes::all())
    }

    /// Random table over `types`. This subset decides which types exist for
    /// the rest of the simulation.
    pub fn build_for_types(types: ParticleTypes) -> Self {
        Self::build_for_types_with(types, &mut rand::rng())
    }

    pub fn build_for_types_with<R: Rng>(types: ParticleTypes, rng: &mut R) -> Self {
        let n = types.len();
        let cells = (0..n * n).map(|_| AtomicF32::new(random_weight(rng))).collect();
        Self { types, cells }
    }

    /// Table with every cell set to `value`
    pub fn filled(types: ParticleTypes, value: f32) -> Self {
        let n = types.len();
        let cells = (0..n * n).map(|_| AtomicF32::new(value)).collect();
        Self { types, cells }
    }

    pub fn types(&self) -> &ParticleTypes {
        &self.types
    }

    /// Number of active types (the table is `len() x len()`)
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Coefficient applied to a `from` particle by the `to` population.
    ///
    /// # Panics
    /// If either type is not active.
    pub fn get(&self, from: ParticleType, to: ParticleType) -> f32 {
        self.cell(from, to).load()
    }

    /// # Panics
    /// If either type is not active.
    pub fn put(&self, from: ParticleType, to: ParticleType, value: f32) {
        self.cell(from, to).store(value);
    }

    /// All coefficients of `from`, in active-type order
    pub fn row(&self, from: ParticleType) -> Vec<f32> {
        let n = self.len();
        let start = self.index(from) * n;
        self.cells[start..start + n].iter().map(AtomicF32::load).collect()
    }

    /// Re-roll every cell from `[-2/3, 2/3)`
    pub fn randomize_all(&self) {
        self.randomize_all_with(&mut rand::rng());
    }

    pub fn randomize_all_with<R: Rng>(&self, rng: &mut R) {
        for cell in &self.cells {
            cell.store(random_weight(rng));
        }
    }

    /// Add a small independent perturbation (about `±0.222`) to every cell
    pub fn nudge_all(&self) {
        self.nudge_all_with(&mut rand::rng());
    }

    pub fn nudge_all_with<R: Rng>(&self, rng: &mut R) {
        for cell in &self.cells {
            cell.store(cell.load() + small_random_weight(rng));
        }
    }

    /// Lookup by positions within the active set, for the hot loop
    #[inline]
    pub(crate) fn get_by_index(&self, from: usize, to: usize) -> f32 {
        self.cells[from * self.len() + to].load()
    }

    fn cell(&self, from: ParticleType, to: ParticleType) -> &AtomicF32 {
        &self.cells[self.index(from) * self.len() + self.index(to)]
    }

    fn index(&self, ty: ParticleType) -> usize {
        match self.types.index_of(ty) {
            Some(index) => index,
            None => panic!("particle type {ty} is not active in this weight table {}", self.types),
        }
    }
}
