//! 8-bit quantized fractions ("f8").
//!
//! Occupancy values are stored on the wire as a single byte `v` meaning
//! `v / 255`. Keeping the quantized byte as the in-memory representation makes
//! decoded voxels compare exactly.

use serde::{Deserialize, Serialize};

/// Converts a quantized byte to a fraction in `[0, 1]`.
pub fn decode_fraction(byte: u8) -> f32 {
    f32::from(byte) / 255.0
}

/// Converts a fraction to its nearest quantized byte, clamping to `[0, 1]`.
///
/// NaN maps to 0.
pub fn encode_fraction(fraction: f32) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A fraction of a voxel's volume, quantized to steps of 1/255.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Occupancy(pub u8);

impl Occupancy {
    /// No occupancy.
    pub const EMPTY: Self = Self(0);
    /// The whole voxel is occupied.
    pub const FULL: Self = Self(u8::MAX);

    /// Quantizes a fraction (clamped to `[0, 1]`).
    pub fn from_fraction(fraction: f32) -> Self {
        Self(encode_fraction(fraction))
    }

    /// Returns the fraction this value represents.
    pub fn fraction(self) -> f32 {
        decode_fraction(self.0)
    }

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    pub fn is_full(self) -> bool {
        self == Self::FULL
    }
}
