//! Closed set of things that get scattered over a chunk.
//!
//! Each kind carries its own placement rule and prototype mesh builder, so
//! samplers and the render context dispatch on the enum instead of on
//! type names.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::core::biome::Biome;
use crate::render::mesh::{
    MeshData, build_grass_mesh, build_quadruped_mesh, build_rock_mesh, build_tree_mesh,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VegetationKind {
    Tree,
    Grass,
    Rock,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AnimalSpecies {
    Deer,
    Rabbit,
    Fox,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ContentKind {
    Vegetation(VegetationKind),
    Animal(AnimalSpecies),
}

/// Per-biome value, indexed by `Biome`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeTable([f64; 4]);

impl BiomeTable {
    pub const fn new(grass: f64, dirt: f64, rock: f64, snow: f64) -> Self {
        BiomeTable([grass, dirt, rock, snow])
    }

    pub fn get(&self, biome: Biome) -> f64 {
        match biome {
            Biome::Grass => self.0[0],
            Biome::Dirt => self.0[1],
            Biome::Rock => self.0[2],
            Biome::Snow => self.0[3],
        }
    }
}

/// Grid-and-roll placement parameters for one vegetation kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRule {
    /// Distance between sub-grid cells, in world units.
    pub spacing: f64,
    pub max_slope: f64,
    pub max_per_chunk: usize,
    pub density: BiomeTable,
    pub scale_range: (f32, f32),
    pub variants: u8,
    /// Offset that keeps this kind's rolls independent of the others.
    pub salt: u32,
}

impl VegetationKind {
    pub const ALL: [VegetationKind; 3] = [VegetationKind::Tree, VegetationKind::Grass, VegetationKind::Rock];

    pub fn rule(&self) -> PlacementRule {
        match self {
            VegetationKind::Tree => PlacementRule {
                spacing: 8.0,
                max_slope: 0.35,
                max_per_chunk: MAX_TREES_PER_CHUNK,
                density: BiomeTable::new(0.35, 0.2, 0.0, 0.02),
                scale_range: (0.8, 1.6),
                variants: 3,
                salt: 11,
            },
            VegetationKind::Grass => PlacementRule {
                spacing: 3.0,
                max_slope: 0.5,
                max_per_chunk: MAX_GRASS_PER_CHUNK,
                density: BiomeTable::new(0.8, 0.35, 0.0, 0.0),
                scale_range: (0.6, 1.2),
                variants: 4,
                salt: 23,
            },
            VegetationKind::Rock => PlacementRule {
                spacing: 12.0,
                max_slope: 0.8,
                max_per_chunk: MAX_ROCKS_PER_CHUNK,
                density: BiomeTable::new(0.05, 0.15, 0.4, 0.2),
                scale_range: (0.5, 1.8),
                variants: 2,
                salt: 37,
            },
        }
    }
}

impl AnimalSpecies {
    pub const ALL: [AnimalSpecies; 3] = [AnimalSpecies::Deer, AnimalSpecies::Rabbit, AnimalSpecies::Fox];

    /// Expected number spawned per chunk before terrain rejection.
    pub fn mean_per_chunk(&self) -> f64 {
        match self {
            AnimalSpecies::Deer => 0.8,
            AnimalSpecies::Rabbit => 1.5,
            AnimalSpecies::Fox => 0.4,
        }
    }

    pub fn max_slope(&self) -> f64 {
        match self {
            AnimalSpecies::Deer => 0.4,
            AnimalSpecies::Rabbit => 0.5,
            AnimalSpecies::Fox => 0.45,
        }
    }

    pub fn lives_in(&self, biome: Biome) -> bool {
        match self {
            AnimalSpecies::Deer => matches!(biome, Biome::Grass | Biome::Dirt),
            AnimalSpecies::Rabbit => biome == Biome::Grass,
            AnimalSpecies::Fox => biome != Biome::Snow,
        }
    }

    pub fn scale(&self) -> f32 {
        match self {
            AnimalSpecies::Deer => 1.0,
            AnimalSpecies::Rabbit => 0.35,
            AnimalSpecies::Fox => 0.55,
        }
    }

    pub fn salt(&self) -> u32 {
        match self {
            AnimalSpecies::Deer => 101,
            AnimalSpecies::Rabbit => 131,
            AnimalSpecies::Fox => 151,
        }
    }

    fn body(&self) -> (Vec3, [f32; 3]) {
        match self {
            AnimalSpecies::Deer => (Vec3::new(0.6, 0.7, 1.4), [0.55, 0.38, 0.22]),
            AnimalSpecies::Rabbit => (Vec3::new(0.5, 0.5, 0.8), [0.70, 0.66, 0.60]),
            AnimalSpecies::Fox => (Vec3::new(0.45, 0.5, 1.2), [0.82, 0.42, 0.15]),
        }
    }
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Vegetation(VegetationKind::Tree),
        ContentKind::Vegetation(VegetationKind::Grass),
        ContentKind::Vegetation(VegetationKind::Rock),
        ContentKind::Animal(AnimalSpecies::Deer),
        ContentKind::Animal(AnimalSpecies::Rabbit),
        ContentKind::Animal(AnimalSpecies::Fox),
    ];

    /// Collision radius at scale 1. Grass never blocks the player.
    pub fn collider_radius(&self) -> Option<f32> {
        match self {
            ContentKind::Vegetation(VegetationKind::Tree) => Some(0.4),
            ContentKind::Vegetation(VegetationKind::Grass) => None,
            ContentKind::Vegetation(VegetationKind::Rock) => Some(0.6),
            ContentKind::Animal(species) => Some(species.body().0.z * 0.5),
        }
    }

    pub fn build_mesh(&self) -> MeshData {
        match self {
            ContentKind::Vegetation(VegetationKind::Tree) => build_tree_mesh(),
            ContentKind::Vegetation(VegetationKind::Grass) => build_grass_mesh(),
            ContentKind::Vegetation(VegetationKind::Rock) => build_rock_mesh(),
            ContentKind::Animal(species) => {
                let (body, color) = species.body();
                build_quadruped_mesh(body, color)
            }
        }
    }
}

/// Ephemeral descriptor for one instance, consumed when the chunk's
/// instanced groups are built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub kind: ContentKind,
    pub position: Vec3,
    pub scale: f32,
    /// Yaw in radians.
    pub rotation: f32,
    pub variant: u8,
}

/// Simple bounding volume handed to the player collision system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderProxy {
    pub kind: ContentKind,
    pub position: Vec3,
    pub radius: f32,
}

impl Placement {
    pub fn collider(&self) -> Option<ColliderProxy> {
        self.kind.collider_radius().map(|radius| ColliderProxy {
            kind: self.kind,
            position: self.position,
            radius: radius * self.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rock_biome_grows_no_trees_or_grass() {
        assert_eq!(VegetationKind::Tree.rule().density.get(Biome::Rock), 0.0);
        assert_eq!(VegetationKind::Grass.rule().density.get(Biome::Rock), 0.0);
        assert!(VegetationKind::Tree.rule().density.get(Biome::Grass) > 0.0);
    }

    #[test]
    fn trees_are_sparser_than_grass() {
        let tree = VegetationKind::Tree.rule();
        let grass = VegetationKind::Grass.rule();
        assert!(tree.spacing > grass.spacing);
        assert!(grass.spacing > CHUNK_SIZE / LOD_SEGMENTS_HIGH as f64);
    }

    #[test]
    fn salts_are_distinct() {
        let mut salts: Vec<u32> = VegetationKind::ALL.iter().map(|k| k.rule().salt).collect();
        salts.extend(AnimalSpecies::ALL.iter().map(|s| s.salt()));
        let len = salts.len();
        salts.sort_unstable();
        salts.dedup();
        assert_eq!(salts.len(), len);
    }

    #[test]
    fn grass_has_no_collider() {
        let grass = Placement {
            kind: ContentKind::Vegetation(VegetationKind::Grass),
            position: Vec3::ZERO,
            scale: 1.0,
            rotation: 0.0,
            variant: 0,
        };
        assert!(grass.collider().is_none());

        let rock = Placement {
            kind: ContentKind::Vegetation(VegetationKind::Rock),
            scale: 2.0,
            ..grass
        };
        assert_eq!(rock.collider().map(|c| c.radius), Some(1.2));
    }
}
