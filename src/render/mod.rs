//! Rendering-side data, independent of any graphics API
//! Contains mesh building, terrain LOD, shared render resources, and the scene seams.

pub mod context;
pub mod lod;
pub mod mesh;
pub mod surface;

// Re-export commonly used types
pub use context::{GeometryStats, GridTopologyCache, RenderContext, SharedMeshes};
pub use lod::{ChunkLod, LodLevel, LodTier, build_chunk_lod};
pub use mesh::{MeshData, compute_vertex_normals, grid_indices};
pub use surface::{ColliderRegistry, NullSurface, SceneSink};
