//! World generation and streaming modules
//! Contains noise, terrain, placement, animals, and chunk streaming.

pub mod fauna;
pub mod loader;
pub mod noise;
pub mod placement;
pub mod terrain;

// Re-export commonly used types
pub use fauna::{Animal, AnimalState};
pub use loader::{StreamStats, StreamStep, WorldManager};
pub use noise::SimplexNoise;
pub use placement::{PlacementNoise, PlacementSampler};
pub use terrain::TerrainGenerator;
