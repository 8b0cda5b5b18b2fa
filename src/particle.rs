//! Particle state: a fixed home position and a live position per particle.
//!
//! Storage is split into two parallel buffers so the live positions can be
//! handed to a renderer as one contiguous slice.

use glam::Vec3;

/// Per-particle base and current positions, indexed by particle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleStore {
    base: Vec<Vec3>,
    current: Vec<Vec3>,
}

impl ParticleStore {
    /// Create a store whose particles start at their base positions.
    pub fn from_base(base: Vec<Vec3>) -> Self {
        let current = base.clone();
        Self { base, current }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Home positions in the diffuse cloud. Never change after creation.
    pub fn base(&self) -> &[Vec3] {
        &self.base
    }

    /// Live positions, updated every tick.
    pub fn current(&self) -> &[Vec3] {
        &self.current
    }

    /// Live positions as raw bytes (`[f32; 3]` per particle) for upload.
    pub fn current_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.current)
    }

    /// Iterate `(index, base, &mut current)` for every particle.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, Vec3, &mut Vec3)> + '_ {
        self.base
            .iter()
            .zip(self.current.iter_mut())
            .enumerate()
            .map(|(i, (&base, current))| (i, base, current))
    }

    /// Move a particle's live position. Non-finite positions are ignored.
    pub fn set_current(&mut self, index: usize, position: Vec3) {
        if position.is_finite() {
            if let Some(slot) = self.current.get_mut(index) {
                *slot = position;
            }
        }
    }

    /// Send every particle back to its base position.
    pub fn reset(&mut self) {
        self.current.copy_from_slice(&self.base);
    }
}
