//! Deterministic vegetation and animal placement
//!
//! Rolls come from simplex noise evaluated at offset coordinates rather
//! than from a stream RNG, so the same chunk always reproduces the same
//! placements without storing anything.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::constants::*;
use crate::core::content::{AnimalSpecies, ContentKind, Placement, PlacementRule, VegetationKind};
use crate::core::coord::ChunkCoord;
use crate::world::noise::SimplexNoise;
use crate::world::terrain::TerrainGenerator;

/// Fraction of a cell the jitter may move a placement. Below 1.0 keeps
/// every placement inside its own cell, and so inside its chunk.
const JITTER: f64 = 0.8;

/// Keeps animal spawns away from the chunk edges.
const ANIMAL_MARGIN: f64 = 0.1;

pub struct PlacementNoise {
    noise: SimplexNoise,
}

impl PlacementNoise {
    pub fn new(seed: f64) -> Self {
        PlacementNoise {
            noise: SimplexNoise::new(seed * PLACEMENT_SEED_FACTOR),
        }
    }

    /// Pseudo-random value in [0, 1) for a world position and salt.
    pub fn roll(&self, x: f64, z: f64, salt: u32) -> f64 {
        let s = salt as f64;
        let n = self
            .noise
            .noise_2d(x * 0.7123 + s * 101.3, z * 0.5371 - s * 57.9);
        ((n + 1.0) * 4513.5).fract()
    }
}

pub struct PlacementSampler {
    noise: PlacementNoise,
}

impl PlacementSampler {
    pub fn new(seed: f64) -> Self {
        PlacementSampler {
            noise: PlacementNoise::new(seed),
        }
    }

    /// Sample one vegetation kind over a chunk with its own rule.
    pub fn sample_vegetation(
        &self,
        terrain: &TerrainGenerator,
        coord: ChunkCoord,
        kind: VegetationKind,
    ) -> Vec<Placement> {
        self.sample_placements(terrain, coord, ContentKind::Vegetation(kind), &kind.rule())
    }

    /// Grid-jitter-reject-roll sampling, capped at `rule.max_per_chunk`.
    pub fn sample_placements(
        &self,
        terrain: &TerrainGenerator,
        coord: ChunkCoord,
        kind: ContentKind,
        rule: &PlacementRule,
    ) -> Vec<Placement> {
        let mut placements = Vec::new();
        if !(rule.spacing > 0.0) || rule.max_per_chunk == 0 {
            return placements;
        }

        let (origin_x, origin_z) = coord.origin();
        let cells = (CHUNK_SIZE / rule.spacing).floor() as u32;
        let classifier = terrain.classifier();
        let salt = rule.salt;

        'grid: for gz in 0..cells {
            for gx in 0..cells {
                if placements.len() >= rule.max_per_chunk {
                    break 'grid;
                }

                let cell_x = origin_x + (gx as f64 + 0.5) * rule.spacing;
                let cell_z = origin_z + (gz as f64 + 0.5) * rule.spacing;
                let x = cell_x + (self.noise.roll(cell_x, cell_z, salt) - 0.5) * rule.spacing * JITTER;
                let z = cell_z + (self.noise.roll(cell_x, cell_z, salt + 1) - 0.5) * rule.spacing * JITTER;

                if terrain.default_slope_at(x, z) > rule.max_slope {
                    continue;
                }

                let y = terrain.height_at(x, z);
                let density = rule.density.get(classifier.biome_at(y));
                if self.noise.roll(x, z, salt + 2) >= density {
                    continue;
                }

                let (min_scale, max_scale) = rule.scale_range;
                let scale = min_scale + (max_scale - min_scale) * self.noise.roll(x, z, salt + 3) as f32;
                let rotation = (self.noise.roll(x, z, salt + 4) * TAU) as f32;
                let variant = (self.noise.roll(x, z, salt + 5) * rule.variants.max(1) as f64) as u8;

                placements.push(Placement {
                    kind,
                    position: Vec3::new(x as f32, y as f32, z as f32),
                    scale,
                    rotation,
                    variant,
                });
            }
        }

        placements
    }

    /// Animals draw a count per species from its mean, then pick spots
    /// inside the chunk, skipping steep ground and foreign biomes.
    pub fn sample_animals(&self, terrain: &TerrainGenerator, coord: ChunkCoord) -> Vec<Placement> {
        let mut placements = Vec::new();
        let (origin_x, origin_z) = coord.origin();
        let center_x = origin_x + CHUNK_SIZE * 0.5;
        let center_z = origin_z + CHUNK_SIZE * 0.5;
        let classifier = terrain.classifier();

        'species: for species in AnimalSpecies::ALL {
            let salt = species.salt();
            let count = (species.mean_per_chunk() + self.noise.roll(center_x, center_z, salt)).floor() as u32;

            for i in 0..count {
                if placements.len() >= MAX_ANIMALS_PER_CHUNK {
                    break 'species;
                }

                let k = i as f64 * 7.31;
                let fx = self.noise.roll(center_x + k, center_z, salt + 1);
                let fz = self.noise.roll(center_x, center_z + k, salt + 2);
                let span = 1.0 - 2.0 * ANIMAL_MARGIN;
                let x = origin_x + (ANIMAL_MARGIN + span * fx) * CHUNK_SIZE;
                let z = origin_z + (ANIMAL_MARGIN + span * fz) * CHUNK_SIZE;

                if terrain.default_slope_at(x, z) > species.max_slope() {
                    continue;
                }
                let y = terrain.height_at(x, z);
                if !species.lives_in(classifier.biome_at(y)) {
                    continue;
                }

                placements.push(Placement {
                    kind: ContentKind::Animal(species),
                    position: Vec3::new(x as f32, y as f32, z as f32),
                    scale: species.scale(),
                    rotation: (self.noise.roll(x, z, salt + 3) * TAU) as f32,
                    variant: 0,
                });
            }
        }

        placements
    }
}
