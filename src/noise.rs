//! Smooth gradient noise shared by the flow-field artworks.

use noise::{NoiseFn, Perlin};
use rand::Rng;

/// Seeded Perlin field sampled in `[0, 1]`
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
    seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// Field with a seed drawn from `rng`
    pub fn from_rng(rng: &mut impl Rng) -> Self {
        Self::new(rng.random())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// 2D sample in `[0, 1]`
    pub fn get2(&self, x: f32, y: f32) -> f32 {
        self.get3(x, y, 0.0)
    }

    /// 3D sample in `[0, 1]`; the third axis is usually time
    pub fn get3(&self, x: f32, y: f32, z: f32) -> f32 {
        let raw = self.perlin.get([x as f64, y as f64, z as f64]) as f32;
        (raw * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}
