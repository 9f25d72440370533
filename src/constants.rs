// World constants
pub const CHUNK_SIZE: f64 = 64.0;
pub const RENDER_DISTANCE: u32 = 2;
pub const MAX_RENDER_DISTANCE: u32 = 12;
pub const DEFAULT_SEED: f64 = 42.0;

// Terrain shaping
pub const HEIGHT_SCALE: f64 = 60.0;
pub const HEIGHT_CURVE: f64 = 1.8;
pub const SLOPE_SAMPLE_DISTANCE: f64 = 1.0;

pub const CONTINENTAL_FREQUENCY: f64 = 0.0025;
pub const CONTINENTAL_AMPLITUDE: f64 = 45.0;
pub const CONTINENTAL_OCTAVES: u32 = 5;
pub const DETAIL_FREQUENCY: f64 = 0.012;
pub const DETAIL_AMPLITUDE: f64 = 12.0;
pub const DETAIL_OCTAVES: u32 = 4;
pub const MICRO_FREQUENCY: f64 = 0.06;
pub const MICRO_AMPLITUDE: f64 = 3.0;
pub const MICRO_OCTAVES: u32 = 2;
pub const FBM_LACUNARITY: f64 = 2.0;
pub const FBM_GAIN: f64 = 0.5;

// Seed multipliers for the decorrelated noise instances
pub const CONTINENTAL_SEED_FACTOR: f64 = 1.0;
pub const DETAIL_SEED_FACTOR: f64 = 2.713;
pub const MICRO_SEED_FACTOR: f64 = 7.919;
pub const PLACEMENT_SEED_FACTOR: f64 = 2.71828;

// Biome bands, as fractions of HEIGHT_SCALE
pub const BIOME_GRASS_MAX: f64 = 0.25;
pub const BIOME_DIRT_MAX: f64 = 0.45;
pub const BIOME_ROCK_MAX: f64 = 0.7;
pub const SLOPE_ROCK_THRESHOLD: f64 = 0.45;
pub const ROCK_DARKEN: f32 = 0.7;

// LOD tiers
pub const LOD_SEGMENTS_HIGH: u32 = 32;
pub const LOD_SEGMENTS_MEDIUM: u32 = 16;
pub const LOD_SEGMENTS_LOW: u32 = 8;
pub const MAX_LOD_SEGMENTS: u32 = 256;

// Placement caps
pub const MAX_TREES_PER_CHUNK: usize = 48;
pub const MAX_GRASS_PER_CHUNK: usize = 400;
pub const MAX_ROCKS_PER_CHUNK: usize = 24;
pub const MAX_ANIMALS_PER_CHUNK: usize = 6;

// Animal behaviour
pub const ANIMAL_FLEE_RADIUS: f32 = 12.0;
pub const ANIMAL_CALM_RADIUS: f32 = 24.0;
pub const ANIMAL_WANDER_SPEED: f32 = 1.5;
pub const ANIMAL_FLEE_SPEED: f32 = 6.0;
