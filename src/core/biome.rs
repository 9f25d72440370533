use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Biome {
    #[default]
    Grass,
    Dirt,
    Rock,
    Snow,
}

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Grass, Biome::Dirt, Biome::Rock, Biome::Snow];

    /// Band for a height already normalized by the height scale.
    pub fn from_normalized_height(n: f64) -> Self {
        if n < BIOME_GRASS_MAX {
            Biome::Grass
        } else if n < BIOME_DIRT_MAX {
            Biome::Dirt
        } else if n < BIOME_ROCK_MAX {
            Biome::Rock
        } else {
            Biome::Snow
        }
    }

    /// Normalized lower and upper elevation of the band.
    pub fn band(&self) -> (f64, f64) {
        match self {
            Biome::Grass => (0.0, BIOME_GRASS_MAX),
            Biome::Dirt => (BIOME_GRASS_MAX, BIOME_DIRT_MAX),
            Biome::Rock => (BIOME_DIRT_MAX, BIOME_ROCK_MAX),
            Biome::Snow => (BIOME_ROCK_MAX, 1.0),
        }
    }

    /// Colors at the bottom and top of the band. Each band's top color is
    /// the next band's bottom color, which keeps the ramp continuous.
    pub fn band_colors(&self) -> ([f32; 3], [f32; 3]) {
        match self {
            Biome::Grass => ([0.30, 0.52, 0.20], [0.42, 0.50, 0.24]),
            Biome::Dirt => ([0.42, 0.50, 0.24], [0.48, 0.40, 0.28]),
            Biome::Rock => ([0.48, 0.40, 0.28], [0.50, 0.48, 0.46]),
            Biome::Snow => ([0.50, 0.48, 0.46], [0.95, 0.95, 0.97]),
        }
    }
}

const ROCK_COLOR: [f32; 3] = [0.45, 0.43, 0.41];

/// Maps terrain height and slope to a vertex color.
#[derive(Clone, Copy, Debug)]
pub struct BiomeClassifier {
    height_scale: f64,
}

impl BiomeClassifier {
    pub fn new(height_scale: f64) -> Self {
        BiomeClassifier { height_scale }
    }

    pub fn normalize(&self, height: f64) -> f64 {
        (height / self.height_scale).clamp(0.0, 1.0)
    }

    pub fn biome_at(&self, height: f64) -> Biome {
        Biome::from_normalized_height(self.normalize(height))
    }

    pub fn color_at(&self, height: f64, slope: f64) -> [f32; 3] {
        let n = self.normalize(height);
        let biome = Biome::from_normalized_height(n);
        let (lo, hi) = biome.band();
        let (bottom, top) = biome.band_colors();
        let t = ((n - lo) / (hi - lo)).clamp(0.0, 1.0) as f32;
        let color = lerp_color(bottom, top, t);

        if slope > SLOPE_ROCK_THRESHOLD {
            let blend = ((slope - SLOPE_ROCK_THRESHOLD) / (1.0 - SLOPE_ROCK_THRESHOLD)).clamp(0.0, 1.0);
            let dark = ROCK_COLOR.map(|c| c * ROCK_DARKEN);
            return lerp_color(color, dark, blend as f32);
        }
        color
    }
}

impl Default for BiomeClassifier {
    fn default() -> Self {
        Self::new(HEIGHT_SCALE)
    }
}

#[inline]
fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
