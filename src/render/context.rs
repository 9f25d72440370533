//! Resources shared by every chunk build, owned by the world manager.
//!
//! `Rc` keeps this single-threaded: streaming runs on one logical thread
//! and the one-build-per-tick throttle depends on that.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::core::content::ContentKind;
use crate::render::mesh::{MeshData, grid_indices};

/// Index buffers for flat grids, one per segment count. Every chunk's
/// tier of the same resolution shares the same buffer.
#[derive(Default)]
pub struct GridTopologyCache {
    grids: FxHashMap<u32, Rc<[u32]>>,
}

impl GridTopologyCache {
    pub fn get(&mut self, segments: u32) -> Rc<[u32]> {
        Rc::clone(
            self.grids
                .entry(segments)
                .or_insert_with(|| grid_indices(segments).into()),
        )
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

/// One prototype mesh per content kind, used by instanced groups.
pub struct SharedMeshes {
    meshes: FxHashMap<ContentKind, Rc<MeshData>>,
}

impl SharedMeshes {
    pub fn new() -> Self {
        let meshes = ContentKind::ALL
            .iter()
            .map(|kind| (*kind, Rc::new(kind.build_mesh())))
            .collect();
        SharedMeshes { meshes }
    }

    pub fn get(&self, kind: ContentKind) -> Rc<MeshData> {
        match self.meshes.get(&kind) {
            Some(mesh) => Rc::clone(mesh),
            None => Rc::new(kind.build_mesh()),
        }
    }
}

impl Default for SharedMeshes {
    fn default() -> Self {
        Self::new()
    }
}

/// Terrain tier meshes built and released. A difference that outlives the
/// active chunk set is leaked geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeometryStats {
    pub tiers_built: u64,
    pub tiers_released: u64,
}

impl GeometryStats {
    pub fn live_tiers(&self) -> u64 {
        self.tiers_built - self.tiers_released
    }
}

#[derive(Default)]
pub struct RenderContext {
    pub topology: GridTopologyCache,
    pub shared: SharedMeshes,
    pub stats: GeometryStats,
    /// Scratch heightmap reused by every tier build.
    pub(crate) heightmap: Vec<f64>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::VegetationKind;

    #[test]
    fn topology_is_shared_per_segment_count() {
        let mut cache = GridTopologyCache::default();
        let a = cache.get(16);
        let b = cache.get(16);
        let c = cache.get(8);
        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn shared_meshes_cover_every_kind() {
        let shared = SharedMeshes::new();
        let tree = ContentKind::Vegetation(VegetationKind::Tree);
        assert!(Rc::ptr_eq(&shared.get(tree), &shared.get(tree)));
        for kind in ContentKind::ALL {
            assert!(!shared.get(kind).vertices.is_empty());
        }
    }
}
