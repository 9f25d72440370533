use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::constants::*;
use crate::error::{Result, WorldError};

pub const DEFAULT_SETTINGS_FILE: &str = "world_settings.bin";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorldSettings {
    pub seed: f64,
    pub render_distance: u32,
    #[serde(default)]
    pub stale_policy: StalePolicy,
    #[serde(default)]
    pub terrain: TerrainSettings,
    #[serde(default)]
    pub lod: LodSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            render_distance: RENDER_DISTANCE,
            stale_policy: StalePolicy::default(),
            terrain: TerrainSettings::default(),
            lod: LodSettings::default(),
        }
    }
}

impl WorldSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.seed.is_finite() {
            return Err(WorldError::NonFiniteSeed(self.seed));
        }
        validate_render_distance(self.render_distance)?;
        self.terrain.validate()?;
        self.lod.validate()
    }
}

pub fn validate_render_distance(render_distance: u32) -> Result<()> {
    if render_distance == 0 || render_distance > MAX_RENDER_DISTANCE {
        return Err(WorldError::InvalidRenderDistance(render_distance));
    }
    Ok(())
}

/// What happens to chunks whose queued load is no longer needed when the
/// player's neighborhood is re-evaluated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Queued loads always run; a chunk that finishes loading out of range
    /// is queued straight back for unload.
    Complete,
    /// Queued loads that left the neighborhood are dropped.
    #[default]
    Cancel,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct NoisePass {
    pub frequency: f64,
    pub amplitude: f64,
    pub octaves: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TerrainSettings {
    pub height_scale: f64,
    pub height_curve: f64,
    pub slope_sample_distance: f64,
    pub lacunarity: f64,
    pub gain: f64,
    pub continental: NoisePass,
    pub detail: NoisePass,
    pub micro: NoisePass,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            height_scale: HEIGHT_SCALE,
            height_curve: HEIGHT_CURVE,
            slope_sample_distance: SLOPE_SAMPLE_DISTANCE,
            lacunarity: FBM_LACUNARITY,
            gain: FBM_GAIN,
            continental: NoisePass {
                frequency: CONTINENTAL_FREQUENCY,
                amplitude: CONTINENTAL_AMPLITUDE,
                octaves: CONTINENTAL_OCTAVES,
            },
            detail: NoisePass {
                frequency: DETAIL_FREQUENCY,
                amplitude: DETAIL_AMPLITUDE,
                octaves: DETAIL_OCTAVES,
            },
            micro: NoisePass {
                frequency: MICRO_FREQUENCY,
                amplitude: MICRO_AMPLITUDE,
                octaves: MICRO_OCTAVES,
            },
        }
    }
}

impl TerrainSettings {
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("height_scale", self.height_scale),
            ("height_curve", self.height_curve),
            ("slope_sample_distance", self.slope_sample_distance),
            ("lacunarity", self.lacunarity),
            ("gain", self.gain),
            ("continental.frequency", self.continental.frequency),
            ("detail.frequency", self.detail.frequency),
            ("micro.frequency", self.micro.frequency),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(WorldError::InvalidTerrainSetting(name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LodSettings {
    pub high_segments: u32,
    pub medium_segments: u32,
    pub low_segments: u32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            high_segments: LOD_SEGMENTS_HIGH,
            medium_segments: LOD_SEGMENTS_MEDIUM,
            low_segments: LOD_SEGMENTS_LOW,
        }
    }
}

impl LodSettings {
    pub fn validate(&self) -> Result<()> {
        for segments in [self.high_segments, self.medium_segments, self.low_segments] {
            if segments == 0 || segments > MAX_LOD_SEGMENTS {
                return Err(WorldError::InvalidSegments(segments));
            }
        }
        Ok(())
    }
}

pub fn save_settings(path: &Path, settings: &WorldSettings) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, settings)?;
    Ok(())
}

pub fn load_settings(path: &Path) -> Result<WorldSettings> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let settings: WorldSettings = bincode::deserialize_from(&mut reader)?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        WorldSettings::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let mut settings = WorldSettings::default();
        settings.seed = f64::NAN;
        assert!(matches!(settings.validate(), Err(WorldError::NonFiniteSeed(_))));

        let mut settings = WorldSettings::default();
        settings.render_distance = 0;
        assert!(matches!(
            settings.validate(),
            Err(WorldError::InvalidRenderDistance(0))
        ));

        let mut settings = WorldSettings::default();
        settings.lod.low_segments = 0;
        assert!(matches!(settings.validate(), Err(WorldError::InvalidSegments(0))));

        let mut settings = WorldSettings::default();
        settings.terrain.height_scale = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(WorldError::InvalidTerrainSetting("height_scale"))
        ));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let path = std::env::temp_dir().join(format!("wanderland-settings-{}.bin", std::process::id()));
        let mut settings = WorldSettings::default();
        settings.seed = 1234.5;
        settings.render_distance = 4;
        settings.stale_policy = StalePolicy::Complete;

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("wanderland-does-not-exist.bin");
        assert!(matches!(load_settings(&path), Err(WorldError::Io(_))));
    }
}
