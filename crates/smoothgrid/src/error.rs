//! Error types for decoding blobs and constructing terrain values.

use std::fmt;

/// Axis of a chunk-space position, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// What went wrong while decoding a SmoothGrid blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    /// The first byte is not the SmoothGrid magic value.
    #[error("invalid magic byte {0:#04x}")]
    InvalidMagic(u8),
    /// The chunk size exponent is outside `0..=8`.
    #[error("unsupported chunk size exponent {0}")]
    UnsupportedChunkSize(u8),
    /// The input ended in the middle of a field, run, or chunk.
    #[error("input truncated")]
    TruncatedInput,
    /// A voxel run would place more voxels than the chunk has left.
    #[error("run of {repeat} voxels overshoots chunk ({remaining} remaining)")]
    VoxelBudgetExceeded {
        /// Repeat count of the offending run.
        repeat: u16,
        /// Voxels still unfilled in the chunk when the run was read.
        remaining: usize,
    },
    /// An absolute chunk position left the supported world range.
    #[error("chunk position {axis} = {value} outside ±262144")]
    PositionOutOfRange {
        /// Offending axis.
        axis: Axis,
        /// Absolute chunk-space value after applying the delta.
        value: i64,
    },
}

/// A terminal decode failure and the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte offset {offset}")]
pub struct DecodeError {
    /// Failure category.
    pub kind: DecodeErrorKind,
    /// Offset into the input blob.
    pub offset: usize,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Errors raised when building terrain values in memory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A chunk position component is outside ±262,144.
    #[error("chunk position {axis} = {value} outside ±262144")]
    PositionOutOfRange {
        /// Offending axis.
        axis: Axis,
        /// Requested value.
        value: i64,
    },
    /// The chunk size exponent is outside `0..=8`.
    #[error("unsupported chunk size exponent {0}")]
    UnsupportedChunkSize(u8),
    /// A voxel array is not a cube with a power-of-two side of at most 256.
    #[error("{0} voxels do not form a supported chunk")]
    InvalidVoxelCount(usize),
    /// A material index does not fit in six bits.
    #[error("material index {0} exceeds 63")]
    InvalidMaterial(u8),
    /// A chunk's size does not match the blob it is added to.
    #[error("chunk size exponent {actual} does not match blob exponent {expected}")]
    ChunkSizeMismatch {
        /// Exponent declared by the blob.
        expected: u8,
        /// Exponent of the rejected chunk.
        actual: u8,
    },
}

/// A position delta that the sign-magnitude codec cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("delta {0} is outside the representable range")]
pub struct DeltaRangeError(pub i32);
