use std::rc::Rc;

use glam::{Mat4, Quat, Vec3};

use crate::core::content::{ColliderProxy, ContentKind, Placement, VegetationKind};
use crate::core::coord::ChunkCoord;
use crate::render::context::{GeometryStats, RenderContext};
use crate::render::lod::{ChunkLod, build_chunk_lod};
use crate::render::mesh::MeshData;
use crate::utils::settings::LodSettings;
use crate::world::fauna::Animal;
use crate::world::placement::PlacementSampler;
use crate::world::terrain::TerrainGenerator;

/// Every instance of one content kind in a chunk, drawn with one shared mesh.
pub struct InstancedGroup {
    pub kind: ContentKind,
    pub mesh: Rc<MeshData>,
    pub transforms: Vec<Mat4>,
}

impl InstancedGroup {
    fn from_placements(kind: ContentKind, mesh: Rc<MeshData>, placements: &[Placement]) -> Self {
        let transforms = placements.iter().map(instance_transform).collect();
        InstancedGroup {
            kind,
            mesh,
            transforms,
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

fn instance_transform(placement: &Placement) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(placement.scale),
        Quat::from_rotation_y(placement.rotation),
        placement.position,
    )
}

/// One group per vegetation kind, present even when empty.
pub struct VegetationBundle {
    pub groups: Vec<InstancedGroup>,
    pub colliders: Vec<ColliderProxy>,
}

impl VegetationBundle {
    pub fn group(&self, kind: VegetationKind) -> Option<&InstancedGroup> {
        self.groups
            .iter()
            .find(|group| group.kind == ContentKind::Vegetation(kind))
    }

    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(InstancedGroup::len).sum()
    }
}

pub struct AnimalBundle {
    pub animals: Vec<Animal>,
}

/// A fully built chunk. Terrain, vegetation and animals are assembled
/// before the value exists, so an active chunk is never partially loaded.
pub struct Chunk {
    pub coord: ChunkCoord,
    pub terrain: ChunkLod,
    pub vegetation: VegetationBundle,
    pub animals: AnimalBundle,
}

impl Chunk {
    pub fn build(
        coord: ChunkCoord,
        terrain: &TerrainGenerator,
        sampler: &PlacementSampler,
        lod: &LodSettings,
        ctx: &mut RenderContext,
    ) -> Self {
        let mut groups = Vec::with_capacity(VegetationKind::ALL.len());
        let mut colliders = Vec::new();
        for kind in VegetationKind::ALL {
            let placements = sampler.sample_vegetation(terrain, coord, kind);
            colliders.extend(placements.iter().filter_map(Placement::collider));
            let content = ContentKind::Vegetation(kind);
            groups.push(InstancedGroup::from_placements(
                content,
                ctx.shared.get(content),
                &placements,
            ));
        }

        let base_id = chunk_hash(coord);
        let animals = sampler
            .sample_animals(terrain, coord)
            .iter()
            .enumerate()
            .filter_map(|(i, placement)| match placement.kind {
                ContentKind::Animal(species) => {
                    Some(Animal::from_placement(placement, species, base_id.wrapping_add(i as u32)))
                }
                ContentKind::Vegetation(_) => None,
            })
            .collect();

        let terrain_lod = build_chunk_lod(terrain, coord, lod, ctx);

        Chunk {
            coord,
            terrain: terrain_lod,
            vegetation: VegetationBundle { groups, colliders },
            animals: AnimalBundle { animals },
        }
    }

    /// Static vegetation proxies followed by animals at their current spots.
    pub fn colliders(&self) -> Vec<ColliderProxy> {
        let mut proxies = self.vegetation.colliders.clone();
        proxies.extend(self.animals.animals.iter().map(Animal::collider));
        proxies
    }

    /// Release the terrain tiers and drop the instanced groups.
    pub fn dispose(self, stats: &mut GeometryStats) {
        stats.tiers_released += self.terrain.dispose() as u64;
    }
}

fn chunk_hash(coord: ChunkCoord) -> u32 {
    let key = coord.packed();
    let hash = ((key >> 32) as u32).wrapping_mul(73856093) ^ (key as u32).wrapping_mul(19349663);
    hash.wrapping_mul(1000)
}
