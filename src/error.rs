use std::io;

#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    #[error("world coordinate ({x}, {z}) is not finite")]
    NonFiniteCoordinate { x: f64, z: f64 },
    #[error("world coordinate ({x}, {z}) is outside the streamable chunk range")]
    CoordinateOutOfRange { x: f64, z: f64 },
    #[error("seed {0} is not finite")]
    NonFiniteSeed(f64),
    #[error("render distance {0} is outside 1..={max}", max = crate::constants::MAX_RENDER_DISTANCE)]
    InvalidRenderDistance(u32),
    #[error("LOD segment count {0} is outside 1..={max}", max = crate::constants::MAX_LOD_SEGMENTS)]
    InvalidSegments(u32),
    #[error("terrain setting \"{0}\" must be finite and positive")]
    InvalidTerrainSetting(&'static str),
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;
