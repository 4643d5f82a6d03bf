//! Chunk-space positions.

use serde::{Deserialize, Serialize};

use crate::delta::EncodedDelta;
use crate::error::{Axis, DecodeErrorKind, ModelError};

/// World units spanned by one chunk along each axis.
pub const CHUNK_WORLD_SIZE: i64 = 128;

/// Largest absolute chunk coordinate. The engine rejects terrain past 2^23
/// world units, where `f32` stops resolving whole units.
pub const MAX_CHUNK_COORD: i32 = (1 << 23) / 32;

/// Position of a chunk in chunk space (one unit = 128 world units).
///
/// Ordering is ascending X, then Y, then Z, which is the order chunks are
/// expected to appear in a blob.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "[i32; 3]", into = "[i32; 3]")]
pub struct ChunkPosition {
    x: i32,
    y: i32,
    z: i32,
}

impl ChunkPosition {
    /// The origin, which is also the base for the first chunk's delta.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Creates a position, rejecting components outside `±MAX_CHUNK_COORD`.
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self, ModelError> {
        Self::checked([i64::from(x), i64::from(y), i64::from(z)])
            .map_err(|(axis, value)| ModelError::PositionOutOfRange { axis, value })
    }

    /// Creates a position, clamping each component into range.
    pub fn clamped(x: i32, y: i32, z: i32) -> Self {
        let c = |v: i32| v.clamp(-MAX_CHUNK_COORD, MAX_CHUNK_COORD);
        Self {
            x: c(x),
            y: c(y),
            z: c(z),
        }
    }

    pub fn x(self) -> i32 {
        self.x
    }

    pub fn y(self) -> i32 {
        self.y
    }

    pub fn z(self) -> i32 {
        self.z
    }

    /// Returns `[x, y, z]`.
    pub fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// World-space coordinates of the chunk's minimum corner.
    pub fn world_origin(self) -> [i64; 3] {
        self.to_array().map(|c| i64::from(c) * CHUNK_WORLD_SIZE)
    }

    /// Applies a decoded delta, failing if the result leaves the world range.
    pub(crate) fn offset_by(self, delta: [i32; 3]) -> Result<Self, DecodeErrorKind> {
        let mut next = [0i64; 3];
        for ((slot, base), d) in next.iter_mut().zip(self.to_array()).zip(delta) {
            *slot = i64::from(base) + i64::from(d);
        }
        Self::checked(next)
            .map_err(|(axis, value)| DecodeErrorKind::PositionOutOfRange { axis, value })
    }

    /// Delta that moves `self` to `next`. Both positions are in range, so
    /// each axis spans at most `2 * MAX_CHUNK_COORD` and always encodes.
    pub(crate) fn delta_to(self, next: Self) -> EncodedDelta {
        EncodedDelta::encode_in_range([next.x - self.x, next.y - self.y, next.z - self.z])
    }

    fn checked(coords: [i64; 3]) -> Result<Self, (Axis, i64)> {
        let max = i64::from(MAX_CHUNK_COORD);
        for (axis, value) in [Axis::X, Axis::Y, Axis::Z].into_iter().zip(coords) {
            if !(-max..=max).contains(&value) {
                return Err((axis, value));
            }
        }
        Ok(Self {
            x: coords[0] as i32,
            y: coords[1] as i32,
            z: coords[2] as i32,
        })
    }
}

impl TryFrom<[i32; 3]> for ChunkPosition {
    type Error = ModelError;

    fn try_from([x, y, z]: [i32; 3]) -> Result<Self, Self::Error> {
        Self::new(x, y, z)
    }
}

impl From<ChunkPosition> for [i32; 3] {
    fn from(value: ChunkPosition) -> Self {
        value.to_array()
    }
}
