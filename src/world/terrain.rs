//! Deterministic heightfield built from three fBm passes
//!
//! continental (broad landmass) + detail (hills) + micro (bumps), then a
//! normalize-clamp-curve step that flattens valleys and sharpens peaks.

use crate::constants::*;
use crate::core::biome::BiomeClassifier;
use crate::core::coord::ChunkCoord;
use crate::utils::settings::{NoisePass, TerrainSettings};
use crate::world::noise::SimplexNoise;

/// Reshape a normalized height. Negative input is clamped to zero first.
#[inline]
pub fn curve_height(normalized: f64, exponent: f64) -> f64 {
    normalized.max(0.0).powf(exponent)
}

pub struct TerrainGenerator {
    continental: SimplexNoise,
    detail: SimplexNoise,
    micro: SimplexNoise,
    settings: TerrainSettings,
    classifier: BiomeClassifier,
    pub seed: f64,
}

impl TerrainGenerator {
    pub fn new(seed: f64) -> Self {
        Self::with_settings(seed, TerrainSettings::default())
    }

    pub fn with_settings(seed: f64, settings: TerrainSettings) -> Self {
        TerrainGenerator {
            continental: SimplexNoise::new(seed * CONTINENTAL_SEED_FACTOR),
            detail: SimplexNoise::new(seed * DETAIL_SEED_FACTOR),
            micro: SimplexNoise::new(seed * MICRO_SEED_FACTOR),
            classifier: BiomeClassifier::new(settings.height_scale),
            settings,
            seed,
        }
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn classifier(&self) -> BiomeClassifier {
        self.classifier
    }

    fn sample_pass(&self, noise: &SimplexNoise, pass: &NoisePass, x: f64, z: f64) -> f64 {
        noise.fbm(
            x * pass.frequency,
            z * pass.frequency,
            pass.octaves,
            self.settings.lacunarity,
            self.settings.gain,
        ) * pass.amplitude
    }

    /// Sum of the three passes before normalization.
    pub fn raw_height(&self, x: f64, z: f64) -> f64 {
        let continental = self.sample_pass(&self.continental, &self.settings.continental, x, z);
        let detail = self.sample_pass(&self.detail, &self.settings.detail, x, z);
        let micro = self.sample_pass(&self.micro, &self.settings.micro, x, z);
        continental + detail + micro
    }

    /// Ground height in world units at (x, z).
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        let scale = self.settings.height_scale;
        let normalized = (self.raw_height(x, z) / scale + 1.0) * 0.5;
        curve_height(normalized, self.settings.height_curve) * scale
    }

    /// Forward-difference slope heuristic in [0, 1].
    pub fn slope_at(&self, x: f64, z: f64, sample_distance: f64) -> f64 {
        let d = if sample_distance.is_finite() && sample_distance > 0.0 {
            sample_distance
        } else {
            self.settings.slope_sample_distance
        };
        let h = self.height_at(x, z);
        let dx = (self.height_at(x + d, z) - h) / d;
        let dz = (self.height_at(x, z + d) - h) / d;
        ((dx * dx + dz * dz).sqrt() / 2.0).clamp(0.0, 1.0)
    }

    /// Slope at the configured sample distance.
    pub fn default_slope_at(&self, x: f64, z: f64) -> f64 {
        self.slope_at(x, z, self.settings.slope_sample_distance)
    }

    /// Row-major `(segments + 1)^2` grid of heights over the chunk, rows
    /// running along +Z. Reuses `out`'s allocation.
    pub fn fill_heightmap(&self, coord: ChunkCoord, segments: u32, out: &mut Vec<f64>) {
        let segments = segments.max(1);
        let side = segments as usize + 1;
        let (origin_x, origin_z) = coord.origin();
        let step = CHUNK_SIZE / segments as f64;

        out.clear();
        out.reserve(side * side);
        for row in 0..side {
            let z = origin_z + row as f64 * step;
            for col in 0..side {
                let x = origin_x + col as f64 * step;
                out.push(self.height_at(x, z));
            }
        }
    }

    pub fn heightmap(&self, coord: ChunkCoord, segments: u32) -> Vec<f64> {
        let mut out = Vec::new();
        self.fill_heightmap(coord, segments, &mut out);
        out
    }
}
