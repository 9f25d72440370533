//! Core data structures for the world
//! Contains biomes, chunk coordinates, content kinds, chunks, and vertices.

pub mod biome;
pub mod chunk;
pub mod content;
pub mod coord;
pub mod vertex;

// Re-export commonly used types
pub use biome::{Biome, BiomeClassifier};
pub use chunk::{AnimalBundle, Chunk, InstancedGroup, VegetationBundle};
pub use content::{AnimalSpecies, ColliderProxy, ContentKind, Placement, PlacementRule, VegetationKind};
pub use coord::ChunkCoord;
pub use vertex::Vertex;
