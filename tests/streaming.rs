use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use wanderland::core::chunk::Chunk;
use wanderland::core::content::ColliderProxy;
use wanderland::{
    CHUNK_SIZE, ChunkCoord, ColliderRegistry, SceneSink, StalePolicy, WorldManager, WorldSettings,
};

/// Records every call so tests can check pairing and ordering.
#[derive(Default)]
struct RecordingScene {
    shown: FxHashSet<ChunkCoord>,
    adds: usize,
    removes: usize,
    double_adds: usize,
    orphan_removes: usize,
}

impl SceneSink for RecordingScene {
    fn add_chunk(&mut self, coord: ChunkCoord, chunk: &Chunk) {
        assert_eq!(chunk.coord, coord);
        self.adds += 1;
        if !self.shown.insert(coord) {
            self.double_adds += 1;
        }
    }

    fn remove_chunk(&mut self, coord: ChunkCoord) {
        self.removes += 1;
        if !self.shown.remove(&coord) {
            self.orphan_removes += 1;
        }
    }
}

#[derive(Default)]
struct RecordingColliders {
    registered: FxHashMap<ChunkCoord, Vec<ColliderProxy>>,
}

impl RecordingColliders {
    fn total(&self) -> usize {
        self.registered.values().map(Vec::len).sum()
    }
}

impl ColliderRegistry for RecordingColliders {
    fn register(&mut self, coord: ChunkCoord, proxies: &[ColliderProxy]) {
        let previous = self.registered.insert(coord, proxies.to_vec());
        assert!(previous.is_none(), "colliders registered twice for {coord}");
    }

    fn unregister(&mut self, coord: ChunkCoord) {
        assert!(
            self.registered.remove(&coord).is_some(),
            "unregistered unknown chunk {coord}"
        );
    }
}

struct Harness {
    world: WorldManager,
    scene: RecordingScene,
    colliders: RecordingColliders,
}

impl Harness {
    fn new(render_distance: u32, stale_policy: StalePolicy) -> Self {
        let settings = WorldSettings {
            render_distance,
            stale_policy,
            ..WorldSettings::default()
        };
        Harness {
            world: WorldManager::new(&settings).unwrap(),
            scene: RecordingScene::default(),
            colliders: RecordingColliders::default(),
        }
    }

    fn tick(&mut self, player: Vec3) -> wanderland::StreamStep {
        self.world
            .update(player, &mut self.scene, &mut self.colliders)
            .unwrap()
    }

    fn settle(&mut self, player: Vec3) -> usize {
        let mut ticks = 0;
        loop {
            self.tick(player);
            ticks += 1;
            if self.world.is_settled() {
                return ticks;
            }
            assert!(ticks < 10_000, "streaming never settled");
        }
    }
}

fn at_chunk(cx: i32, cz: i32) -> Vec3 {
    let size = CHUNK_SIZE as f32;
    Vec3::new((cx as f32 + 0.5) * size, 0.0, (cz as f32 + 0.5) * size)
}

fn square(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
    let mut coords: Vec<ChunkCoord> = center.neighborhood(radius).collect();
    coords.sort_unstable();
    coords
}

#[test]
fn origin_with_distance_two_settles_to_25_chunks_in_25_ticks() {
    let mut h = Harness::new(2, StalePolicy::Cancel);
    let player = Vec3::new(0.0, 0.0, 0.0);
    for tick in 1..=25 {
        h.tick(player);
        assert_eq!(h.world.stats().active, tick);
    }
    assert!(h.world.is_settled());

    let expected = square(ChunkCoord::new(0, 0), 2);
    assert_eq!(expected.first(), Some(&ChunkCoord::new(-2, -2)));
    assert_eq!(expected.last(), Some(&ChunkCoord::new(2, 2)));
    assert_eq!(h.world.active_coords(), expected);
}

#[test]
fn at_most_one_load_and_one_unload_per_update() {
    let mut h = Harness::new(3, StalePolicy::Cancel);
    h.settle(at_chunk(0, 0));
    let path = [at_chunk(40, 0), at_chunk(-40, 7), at_chunk(0, 0)];
    for player in path {
        for _ in 0..30 {
            let before = h.world.stats();
            h.tick(player);
            let after = h.world.stats();
            assert!(after.loads_total - before.loads_total <= 1);
            assert!(after.unloads_total - before.unloads_total <= 1);
        }
    }
}

#[test]
fn jump_to_chunk_five_queues_both_sides_disjointly() {
    let mut h = Harness::new(2, StalePolicy::Cancel);
    h.settle(at_chunk(0, 0));

    let step = h.tick(at_chunk(5, 0));
    assert!(step.loaded.is_some());
    assert!(step.unloaded.is_some());

    let queued_loads: Vec<ChunkCoord> = h.world.queued_loads().collect();
    let queued_unloads: Vec<ChunkCoord> = h.world.queued_unloads().collect();
    // One of each was already processed by this update.
    assert_eq!(queued_loads.len(), 24);
    assert_eq!(queued_unloads.len(), 24);
    assert!(queued_loads.iter().all(|coord| !h.world.is_active(*coord)));
    assert!(
        queued_unloads
            .iter()
            .all(|coord| coord.chebyshev(ChunkCoord::new(5, 0)) > 2)
    );
    assert!(
        queued_loads
            .iter()
            .all(|coord| coord.chebyshev(ChunkCoord::new(5, 0)) <= 2)
    );
}

#[test]
fn settles_to_the_final_neighborhood_under_both_policies() {
    let path = [
        at_chunk(0, 0),
        at_chunk(1, 0),
        at_chunk(9, 3),
        at_chunk(9, 4),
        at_chunk(-6, -6),
        at_chunk(-5, -6),
    ];
    for policy in [StalePolicy::Cancel, StalePolicy::Complete] {
        let mut h = Harness::new(2, policy);
        for player in path {
            for _ in 0..7 {
                h.tick(player);
            }
        }
        h.settle(at_chunk(-5, -6));
        assert_eq!(h.world.active_coords(), square(ChunkCoord::new(-5, -6), 2), "{policy:?}");
    }
}

#[test]
fn surfaces_and_geometry_stay_balanced() {
    let mut h = Harness::new(2, StalePolicy::Complete);
    for cx in 0..12 {
        for _ in 0..5 {
            h.tick(at_chunk(cx, cx / 2));
        }
    }
    h.settle(at_chunk(11, 5));

    let active = h.world.stats().active;
    assert_eq!(h.scene.double_adds, 0);
    assert_eq!(h.scene.orphan_removes, 0);
    assert_eq!(h.scene.shown.len(), active);
    assert_eq!(h.scene.adds - h.scene.removes, active);
    assert_eq!(h.colliders.registered.len(), active);
    assert_eq!(h.world.geometry().live_tiers(), 3 * active as u64);

    let expected_colliders: usize = h
        .world
        .active_coords()
        .iter()
        .filter_map(|coord| h.world.chunk(*coord))
        .map(|chunk| chunk.colliders().len())
        .sum();
    assert_eq!(h.colliders.total(), expected_colliders);

    h.world.unload_all(&mut h.scene, &mut h.colliders);
    assert_eq!(h.world.geometry().live_tiers(), 0);
    assert!(h.scene.shown.is_empty());
    assert!(h.colliders.registered.is_empty());
}

#[test]
fn reloaded_chunks_match_their_first_load() {
    let mut h = Harness::new(1, StalePolicy::Cancel);
    h.settle(at_chunk(0, 0));
    let coord = ChunkCoord::new(1, 1);
    let first = h.world.chunk(coord).map(Chunk::colliders).unwrap();

    h.settle(at_chunk(30, 30));
    assert!(!h.world.is_active(coord));
    h.settle(at_chunk(0, 0));
    let second = h.world.chunk(coord).map(Chunk::colliders).unwrap();
    assert_eq!(first, second);
}

#[test]
fn shrinking_render_distance_unloads_the_ring() {
    let mut h = Harness::new(3, StalePolicy::Cancel);
    h.settle(at_chunk(2, 2));
    assert_eq!(h.world.stats().active, 49);

    h.world.set_render_distance(1).unwrap();
    let ticks = h.settle(at_chunk(2, 2));
    assert_eq!(ticks, 40);
    assert_eq!(h.world.active_coords(), square(ChunkCoord::new(2, 2), 1));
}

#[test]
fn registered_animal_proxies_follow_moving_animals() {
    let mut h = Harness::new(3, StalePolicy::Cancel);
    let player = at_chunk(0, 0);
    h.settle(player);

    for _ in 0..600 {
        h.world.tick_animals(1.0 / 60.0, player, &mut h.colliders);
    }

    let mut animals = 0;
    for coord in h.world.active_coords() {
        let chunk = h.world.chunk(coord).unwrap();
        let registered = &h.colliders.registered[&coord];
        assert_eq!(registered, &chunk.colliders(), "stale proxies for {coord}");
        for (proxy, animal) in registered
            .iter()
            .filter(|p| matches!(p.kind, wanderland::ContentKind::Animal(_)))
            .zip(&chunk.animals.animals)
        {
            assert_eq!(proxy.position, animal.position);
            animals += 1;
        }
    }
    assert_eq!(h.colliders.registered.len(), h.world.stats().active);
    assert!(animals > 0, "no animals spawned around the origin");
}
