//! Throttled chunk streaming around the player
//!
//! Chunks move through absent -> queued-for-load -> active ->
//! queued-for-unload -> absent. Membership is re-evaluated only when the
//! player's chunk (or the render distance) changes; every `update` then
//! builds at most one chunk and tears down at most one, so a teleport
//! never costs more than that in a single step.

use std::collections::VecDeque;

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::chunk::Chunk;
use crate::core::coord::ChunkCoord;
use crate::error::{Result, WorldError};
use crate::render::context::{GeometryStats, RenderContext};
use crate::render::surface::{ColliderRegistry, SceneSink};
use crate::utils::settings::{StalePolicy, WorldSettings, validate_render_distance};
use crate::world::placement::PlacementSampler;
use crate::world::terrain::TerrainGenerator;

/// What a single `update` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStep {
    pub loaded: Option<ChunkCoord>,
    pub unloaded: Option<ChunkCoord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub active: usize,
    pub queued_loads: usize,
    pub queued_unloads: usize,
    pub loads_total: u64,
    pub unloads_total: u64,
}

pub struct WorldManager {
    terrain: TerrainGenerator,
    sampler: PlacementSampler,
    settings: WorldSettings,
    context: RenderContext,
    chunks: FxHashMap<ChunkCoord, Chunk>,
    load_queue: VecDeque<ChunkCoord>,
    unload_queue: VecDeque<ChunkCoord>,
    pending_loads: FxHashSet<ChunkCoord>,
    pending_unloads: FxHashSet<ChunkCoord>,
    center: Option<ChunkCoord>,
    evaluated_distance: u32,
    loads_total: u64,
    unloads_total: u64,
}

impl WorldManager {
    pub fn new(settings: &WorldSettings) -> Result<Self> {
        settings.validate()?;
        tracing::info!(
            seed = settings.seed,
            render_distance = settings.render_distance,
            stale_policy = ?settings.stale_policy,
            "world manager created"
        );

        Ok(WorldManager {
            terrain: TerrainGenerator::with_settings(settings.seed, settings.terrain.clone()),
            sampler: PlacementSampler::new(settings.seed),
            settings: settings.clone(),
            context: RenderContext::new(),
            chunks: FxHashMap::default(),
            load_queue: VecDeque::new(),
            unload_queue: VecDeque::new(),
            pending_loads: FxHashSet::default(),
            pending_unloads: FxHashSet::default(),
            center: None,
            evaluated_distance: settings.render_distance,
            loads_total: 0,
            unloads_total: 0,
        })
    }

    /// One fixed simulation step of streaming.
    pub fn update(
        &mut self,
        player: Vec3,
        scene: &mut dyn SceneSink,
        colliders: &mut dyn ColliderRegistry,
    ) -> Result<StreamStep> {
        if !player.is_finite() {
            return Err(WorldError::NonFiniteCoordinate {
                x: player.x as f64,
                z: player.z as f64,
            });
        }
        let center = ChunkCoord::from_world(player.x as f64, player.z as f64)?;

        if self.center != Some(center) || self.evaluated_distance != self.settings.render_distance {
            self.reevaluate(center);
        }

        let loaded = self.load_next(scene, colliders);
        let unloaded = self.unload_next(scene, colliders);
        Ok(StreamStep { loaded, unloaded })
    }

    fn reevaluate(&mut self, center: ChunkCoord) {
        let radius = self.settings.render_distance;
        let needed: FxHashSet<ChunkCoord> = center.neighborhood(radius).collect();

        let pending_unloads = &mut self.pending_unloads;
        self.unload_queue.retain(|coord| {
            let keep = !needed.contains(coord);
            if !keep {
                pending_unloads.remove(coord);
            }
            keep
        });

        let mut dropped = 0usize;
        if self.settings.stale_policy == StalePolicy::Cancel {
            let pending_loads = &mut self.pending_loads;
            self.load_queue.retain(|coord| {
                let keep = needed.contains(coord);
                if !keep {
                    pending_loads.remove(coord);
                    dropped += 1;
                }
                keep
            });
        }

        let mut new_loads = 0usize;
        for coord in center.neighborhood(radius) {
            if !self.chunks.contains_key(&coord) && self.pending_loads.insert(coord) {
                self.load_queue.push_back(coord);
                new_loads += 1;
            }
        }

        let mut leaving: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| !needed.contains(*coord) && !self.pending_unloads.contains(*coord))
            .copied()
            .collect();
        leaving.sort_unstable();
        let new_unloads = leaving.len();
        for coord in leaving {
            self.pending_unloads.insert(coord);
            self.unload_queue.push_back(coord);
        }

        tracing::debug!(
            %center,
            radius,
            new_loads,
            new_unloads,
            dropped,
            queued_loads = self.load_queue.len(),
            queued_unloads = self.unload_queue.len(),
            "re-evaluated chunk neighborhood"
        );

        self.center = Some(center);
        self.evaluated_distance = radius;
    }

    fn in_range(&self, coord: ChunkCoord) -> bool {
        self.center
            .is_some_and(|center| center.chebyshev(coord) <= self.settings.render_distance)
    }

    fn load_next(
        &mut self,
        scene: &mut dyn SceneSink,
        colliders: &mut dyn ColliderRegistry,
    ) -> Option<ChunkCoord> {
        let coord = self.load_queue.pop_front()?;
        self.pending_loads.remove(&coord);
        if self.chunks.contains_key(&coord) {
            return None;
        }

        let chunk = Chunk::build(
            coord,
            &self.terrain,
            &self.sampler,
            &self.settings.lod,
            &mut self.context,
        );
        scene.add_chunk(coord, &chunk);
        colliders.register(coord, &chunk.colliders());
        tracing::trace!(
            %coord,
            vegetation = chunk.vegetation.instance_count(),
            animals = chunk.animals.animals.len(),
            terrain_bytes = chunk.terrain.byte_size(),
            "chunk loaded"
        );
        self.chunks.insert(coord, chunk);
        self.loads_total += 1;

        // Only reachable when stale loads are allowed to complete.
        if !self.in_range(coord) && self.pending_unloads.insert(coord) {
            tracing::debug!(%coord, "loaded out of range, queued for unload");
            self.unload_queue.push_back(coord);
        }

        Some(coord)
    }

    fn unload_next(
        &mut self,
        scene: &mut dyn SceneSink,
        colliders: &mut dyn ColliderRegistry,
    ) -> Option<ChunkCoord> {
        let coord = self.unload_queue.pop_front()?;
        self.pending_unloads.remove(&coord);
        let chunk = self.chunks.remove(&coord)?;

        scene.remove_chunk(coord);
        colliders.unregister(coord);
        chunk.dispose(&mut self.context.stats);
        self.unloads_total += 1;
        tracing::trace!(%coord, "chunk unloaded");

        Some(coord)
    }

    /// Tear down every active chunk and clear both queues.
    pub fn unload_all(&mut self, scene: &mut dyn SceneSink, colliders: &mut dyn ColliderRegistry) {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        for coord in coords {
            if let Some(chunk) = self.chunks.remove(&coord) {
                scene.remove_chunk(coord);
                colliders.unregister(coord);
                chunk.dispose(&mut self.context.stats);
                self.unloads_total += 1;
            }
        }
        self.load_queue.clear();
        self.unload_queue.clear();
        self.pending_loads.clear();
        self.pending_unloads.clear();
        self.center = None;
        tracing::info!(unloads_total = self.unloads_total, "all chunks unloaded");
    }

    /// Takes effect at the next `update`.
    pub fn set_render_distance(&mut self, render_distance: u32) -> Result<()> {
        validate_render_distance(render_distance)?;
        if render_distance != self.settings.render_distance {
            tracing::info!(
                from = self.settings.render_distance,
                to = render_distance,
                "render distance changed"
            );
            self.settings.render_distance = render_distance;
        }
        Ok(())
    }

    pub fn render_distance(&self) -> u32 {
        self.settings.render_distance
    }

    /// Ground height, independent of which chunks are loaded.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.terrain.height_at(x, z)
    }

    pub fn slope_at(&self, x: f64, z: f64) -> f64 {
        self.terrain.default_slope_at(x, z)
    }

    /// Per-frame LOD switch for every active chunk.
    pub fn update_lods(&mut self, camera: Vec3) {
        for chunk in self.chunks.values_mut() {
            chunk.terrain.select(camera);
        }
    }

    /// Advance every active animal one step and re-register the proxies
    /// of each chunk whose animals may have moved.
    pub fn tick_animals(&mut self, dt: f32, player: Vec3, colliders: &mut dyn ColliderRegistry) {
        let terrain = &self.terrain;
        for (coord, chunk) in self.chunks.iter_mut() {
            if chunk.animals.animals.is_empty() {
                continue;
            }
            for animal in &mut chunk.animals.animals {
                animal.tick(dt, player, terrain);
            }
            colliders.unregister(*coord);
            colliders.register(*coord, &chunk.colliders());
        }
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            active: self.chunks.len(),
            queued_loads: self.load_queue.len(),
            queued_unloads: self.unload_queue.len(),
            loads_total: self.loads_total,
            unloads_total: self.unloads_total,
        }
    }

    /// True once the active set matches the last evaluated neighborhood.
    pub fn is_settled(&self) -> bool {
        self.center.is_some()
            && self.evaluated_distance == self.settings.render_distance
            && self.load_queue.is_empty()
            && self.unload_queue.is_empty()
    }

    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Active coordinates in sorted order.
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn queued_loads(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.load_queue.iter().copied()
    }

    pub fn queued_unloads(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.unload_queue.iter().copied()
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn geometry(&self) -> GeometryStats {
        self.context.stats
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }
}
