//! Three-tier terrain LOD per chunk
//!
//! The mesher only builds the tiers. Picking a tier is a per-frame
//! operation done by whoever owns the camera, through `ChunkLod::select`.

use glam::Vec3;

use crate::constants::CHUNK_SIZE;
use crate::core::coord::ChunkCoord;
use crate::core::vertex::Vertex;
use crate::render::context::RenderContext;
use crate::render::mesh::{MeshData, compute_vertex_normals};
use crate::utils::settings::LodSettings;
use crate::world::terrain::TerrainGenerator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LodTier {
    High,
    Medium,
    Low,
}

impl LodTier {
    pub const ALL: [LodTier; 3] = [LodTier::High, LodTier::Medium, LodTier::Low];

    /// Camera distance from which this tier is used.
    pub fn switch_distance(&self) -> f32 {
        let size = CHUNK_SIZE as f32;
        match self {
            LodTier::High => 0.0,
            LodTier::Medium => 2.0 * size,
            LodTier::Low => 4.0 * size,
        }
    }

    pub fn segments(&self, settings: &LodSettings) -> u32 {
        match self {
            LodTier::High => settings.high_segments,
            LodTier::Medium => settings.medium_segments,
            LodTier::Low => settings.low_segments,
        }
    }

    /// Coarsest tier whose switch distance has been reached.
    pub fn for_distance(distance: f32) -> Self {
        LodTier::ALL
            .into_iter()
            .rev()
            .find(|tier| distance >= tier.switch_distance())
            .unwrap_or(LodTier::High)
    }
}

pub struct LodLevel {
    pub tier: LodTier,
    pub segments: u32,
    pub mesh: MeshData,
}

pub struct ChunkLod {
    pub coord: ChunkCoord,
    /// World position of the chunk origin; vertex positions are local to it.
    pub origin: Vec3,
    levels: Vec<LodLevel>,
    current: LodTier,
}

impl ChunkLod {
    pub fn levels(&self) -> &[LodLevel] {
        &self.levels
    }

    pub fn level(&self, tier: LodTier) -> Option<&LodLevel> {
        self.levels.iter().find(|level| level.tier == tier)
    }

    pub fn current(&self) -> LodTier {
        self.current
    }

    pub fn center(&self) -> Vec3 {
        let half = CHUNK_SIZE as f32 * 0.5;
        Vec3::new(self.origin.x + half, self.origin.y, self.origin.z + half)
    }

    /// Switch to the tier for the camera's horizontal distance to the chunk
    /// center and return it.
    pub fn select(&mut self, camera: Vec3) -> LodTier {
        let center = self.center();
        let distance = Vec3::new(camera.x - center.x, 0.0, camera.z - center.z).length();
        self.current = LodTier::for_distance(distance);
        self.current
    }

    /// Vertex and index bytes across all tiers.
    pub fn byte_size(&self) -> usize {
        self.levels.iter().map(|level| level.mesh.byte_size()).sum()
    }

    /// Release every tier's vertex buffer; returns how many were freed.
    pub fn dispose(self) -> usize {
        let count = self.levels.len();
        drop(self.levels);
        count
    }
}

/// Build all three tiers for a chunk. Each tier samples its own heightmap
/// and gets its own vertex buffer; index buffers come from the shared
/// topology cache.
pub fn build_chunk_lod(
    terrain: &TerrainGenerator,
    coord: ChunkCoord,
    settings: &LodSettings,
    ctx: &mut RenderContext,
) -> ChunkLod {
    let (origin_x, origin_z) = coord.origin();
    let classifier = terrain.classifier();
    let mut heights = std::mem::take(&mut ctx.heightmap);
    let mut levels = Vec::with_capacity(LodTier::ALL.len());

    for tier in LodTier::ALL {
        let segments = tier.segments(settings).max(1);
        terrain.fill_heightmap(coord, segments, &mut heights);

        let side = segments as usize + 1;
        let step = CHUNK_SIZE / segments as f64;
        let mut vertices = Vec::with_capacity(side * side);
        for row in 0..side {
            let local_z = row as f64 * step;
            for col in 0..side {
                let local_x = col as f64 * step;
                let height = heights[row * side + col];
                let slope = terrain.default_slope_at(origin_x + local_x, origin_z + local_z);
                vertices.push(Vertex::new(
                    [local_x as f32, height as f32, local_z as f32],
                    [0.0, 1.0, 0.0],
                    classifier.color_at(height, slope),
                ));
            }
        }

        let indices = ctx.topology.get(segments);
        compute_vertex_normals(&mut vertices, &indices);
        ctx.stats.tiers_built += 1;

        levels.push(LodLevel {
            tier,
            segments,
            mesh: MeshData { vertices, indices },
        });
    }

    ctx.heightmap = heights;

    ChunkLod {
        coord,
        origin: Vec3::new(origin_x as f32, 0.0, origin_z as f32),
        levels,
        current: LodTier::High,
    }
}
