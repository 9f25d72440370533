//! Persistent configuration.

pub mod settings;

pub use settings::{
    DEFAULT_SETTINGS_FILE, LodSettings, NoisePass, StalePolicy, TerrainSettings, WorldSettings,
    load_settings, save_settings,
};
