//! Seams between streaming and the systems that consume chunks.

use crate::core::chunk::Chunk;
use crate::core::content::ColliderProxy;
use crate::core::coord::ChunkCoord;

/// Where finished chunks are shown. Called once per load and once per
/// unload, in that order for any given coordinate.
pub trait SceneSink {
    fn add_chunk(&mut self, coord: ChunkCoord, chunk: &Chunk);
    fn remove_chunk(&mut self, coord: ChunkCoord);
}

/// Player collision system. Proxies are registered per chunk so they can be
/// dropped in one call on unload.
pub trait ColliderRegistry {
    fn register(&mut self, coord: ChunkCoord, proxies: &[ColliderProxy]);
    fn unregister(&mut self, coord: ChunkCoord);
}

/// Headless surface that only keeps counts.
#[derive(Debug, Default)]
pub struct NullSurface {
    pub objects: usize,
    pub colliders: usize,
    per_chunk: rustc_hash::FxHashMap<ChunkCoord, usize>,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneSink for NullSurface {
    fn add_chunk(&mut self, _coord: ChunkCoord, _chunk: &Chunk) {
        self.objects += 1;
    }

    fn remove_chunk(&mut self, _coord: ChunkCoord) {
        self.objects = self.objects.saturating_sub(1);
    }
}

impl ColliderRegistry for NullSurface {
    fn register(&mut self, coord: ChunkCoord, proxies: &[ColliderProxy]) {
        self.colliders += proxies.len();
        *self.per_chunk.entry(coord).or_default() += proxies.len();
    }

    fn unregister(&mut self, coord: ChunkCoord) {
        if let Some(count) = self.per_chunk.remove(&coord) {
            self.colliders -= count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::{ContentKind, VegetationKind};
    use glam::Vec3;

    #[test]
    fn null_surface_balances_colliders() {
        let mut surface = NullSurface::new();
        let proxy = ColliderProxy {
            kind: ContentKind::Vegetation(VegetationKind::Tree),
            position: Vec3::ZERO,
            radius: 0.4,
        };
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(1, 0);
        surface.register(a, &[proxy, proxy]);
        surface.register(b, &[proxy]);
        assert_eq!(surface.colliders, 3);
        surface.unregister(a);
        assert_eq!(surface.colliders, 1);
        surface.unregister(a);
        assert_eq!(surface.colliders, 1);
    }
}
