use serde::{Deserialize, Serialize};

use crate::constants::{CHUNK_SIZE, MAX_RENDER_DISTANCE};
use crate::error::{Result, WorldError};

/// Integer grid coordinate of a terrain chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk containing the world position, by floor division. The chunk
    /// must leave room for a full neighborhood at the largest render
    /// distance without leaving `i32`.
    pub fn from_world(x: f64, z: f64) -> Result<Self> {
        if !x.is_finite() || !z.is_finite() {
            return Err(WorldError::NonFiniteCoordinate { x, z });
        }
        let (cx, cz) = ((x / CHUNK_SIZE).floor(), (z / CHUNK_SIZE).floor());
        let limit = (i32::MAX - MAX_RENDER_DISTANCE as i32) as f64;
        if cx.abs() > limit || cz.abs() > limit {
            return Err(WorldError::CoordinateOutOfRange { x, z });
        }
        Ok(Self {
            cx: cx as i32,
            cz: cz as i32,
        })
    }

    /// World position of the chunk's minimum corner.
    #[inline]
    pub fn origin(self) -> (f64, f64) {
        (self.cx as f64 * CHUNK_SIZE, self.cz as f64 * CHUNK_SIZE)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> u32 {
        (self.cx - other.cx)
            .unsigned_abs()
            .max((self.cz - other.cz).unsigned_abs())
    }

    /// Packed map key: cx in the high 32 bits, cz in the low 32 bits.
    #[inline]
    pub fn packed(self) -> u64 {
        ((self.cx as u32 as u64) << 32) | self.cz as u32 as u64
    }


    /// Every coordinate within Chebyshev distance `radius`, row by row.
    pub fn neighborhood(self, radius: u32) -> impl Iterator<Item = ChunkCoord> {
        let r = radius as i32;
        (-r..=r).flat_map(move |dz| (-r..=r).map(move |dx| self.offset(dx, dz)))
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.cx, self.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_handles_negatives() {
        assert_eq!(ChunkCoord::from_world(0.0, 0.0).unwrap(), ChunkCoord::new(0, 0));
        assert_eq!(
            ChunkCoord::from_world(CHUNK_SIZE - 0.001, 1.0).unwrap(),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(ChunkCoord::from_world(-0.5, -CHUNK_SIZE).unwrap(), ChunkCoord::new(-1, -1));
        assert_eq!(
            ChunkCoord::from_world(-CHUNK_SIZE - 0.5, 5.0 * CHUNK_SIZE).unwrap(),
            ChunkCoord::new(-2, 5)
        );
    }

    #[test]
    fn rejects_non_finite_positions() {
        assert!(ChunkCoord::from_world(f64::NAN, 0.0).is_err());
        assert!(ChunkCoord::from_world(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn origin_is_grid_aligned() {
        assert_eq!(ChunkCoord::new(-2, 3).origin(), (-2.0 * CHUNK_SIZE, 3.0 * CHUNK_SIZE));
    }

    #[test]
    fn rejects_positions_too_far_for_a_neighborhood() {
        for (x, z) in [(1.5e11, 0.0), (0.0, -1.5e11), (f64::MAX, 0.0)] {
            assert!(matches!(
                ChunkCoord::from_world(x, z),
                Err(WorldError::CoordinateOutOfRange { .. })
            ));
        }
        let edge = (i32::MAX - MAX_RENDER_DISTANCE as i32) as f64 * CHUNK_SIZE;
        let coord = ChunkCoord::from_world(edge, -edge).unwrap();
        assert_eq!(coord.neighborhood(MAX_RENDER_DISTANCE).count(), 625);
    }

    #[test]
    fn packed_keys_are_distinct_per_axis() {
        assert_ne!(ChunkCoord::new(1, 0).packed(), ChunkCoord::new(0, 1).packed());
        assert_ne!(ChunkCoord::new(-1, 0).packed(), ChunkCoord::new(0, -1).packed());
        assert_eq!(ChunkCoord::new(0, -1).packed(), u32::MAX as u64);
    }

    #[test]
    fn neighborhood_is_the_chebyshev_square() {
        let center = ChunkCoord::new(5, -3);
        let cells: Vec<_> = center.neighborhood(2).collect();
        assert_eq!(cells.len(), 25);
        assert!(cells.iter().all(|c| c.chebyshev(center) <= 2));
        assert_eq!(center.neighborhood(0).collect::<Vec<_>>(), vec![center]);
    }
}
