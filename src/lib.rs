// Core module with fundamental types
pub mod core;

// Render module with mesh and LOD building
pub mod render;

// World module with generation and streaming
pub mod world;

// Settings persistence
pub mod utils;

// Other modules
pub mod constants;
pub mod error;

// Re-exports
pub use constants::*;
pub use crate::core::{Biome, BiomeClassifier, Chunk, ChunkCoord, ContentKind, Vertex};
pub use error::{Result, WorldError};
pub use render::{ColliderRegistry, LodTier, NullSurface, RenderContext, SceneSink};
pub use utils::{StalePolicy, WorldSettings, load_settings, save_settings};
pub use world::{StreamStats, StreamStep, TerrainGenerator, WorldManager};
