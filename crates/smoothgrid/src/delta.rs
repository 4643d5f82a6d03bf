//! Sign-magnitude chunk position deltas.
//!
//! Each chunk stores the offset from the previous chunk's position as four
//! 3-byte vectors, one byte per axis in each:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 3 | Signedness (`0xFF` = negative axis, anything else = positive) |
//! | 3 | 3 | Magnitude ×65536 |
//! | 6 | 3 | Magnitude ×256 |
//! | 9 | 3 | Magnitude ×1 |
//!
//! On a negative axis the leading zero magnitude bytes are written as the
//! fill byte `0xFF`, so a delta of `-1` is `FF FF FF 01` down that axis. A
//! fill in the ×256 slot only counts if the ×65536 slot was also a fill. When
//! the first significant byte is itself `0xFF`, filling stops one slot early
//! and a literal zero is written instead, which keeps every magnitude
//! decodable.

use serde::{Deserialize, Serialize};

use crate::error::DeltaRangeError;

/// Signedness byte for a negative axis; also the fill byte on that axis.
pub const SIGN_NEGATIVE: u8 = 0xFF;

/// Signedness byte written for a zero or positive axis.
pub const SIGN_POSITIVE: u8 = 0x00;

/// Largest positive delta on one axis.
pub const MAX_POSITIVE_DELTA: i32 = 0x00FF_FFFF;

/// Largest negative delta magnitude on one axis. A `0xFF` in the ×65536 slot
/// of a negative axis always reads as fill.
pub const MAX_NEGATIVE_DELTA: i32 = 0x00FE_FFFF;

/// One axis in wire order: `[signedness, ×65536, ×256, ×1]`.
pub type AxisBytes = [u8; 4];

/// Decodes one axis.
pub fn decode_axis([sign, high, mid, low]: AxisBytes) -> i32 {
    if sign != SIGN_NEGATIVE {
        return weighted(high, mid, low);
    }
    let (high, mid) = match (high, mid) {
        (SIGN_NEGATIVE, SIGN_NEGATIVE) => (0, 0),
        (SIGN_NEGATIVE, mid) => (0, mid),
        literal => literal,
    };
    -weighted(high, mid, low)
}

/// Encodes one axis, rejecting deltas outside
/// `-MAX_NEGATIVE_DELTA..=MAX_POSITIVE_DELTA`.
pub fn encode_axis(delta: i32) -> Result<AxisBytes, DeltaRangeError> {
    if !(-MAX_NEGATIVE_DELTA..=MAX_POSITIVE_DELTA).contains(&delta) {
        return Err(DeltaRangeError(delta));
    }
    Ok(axis_bytes(delta))
}

/// Encodes one axis whose range has already been checked.
fn axis_bytes(delta: i32) -> AxisBytes {
    let magnitude = delta.unsigned_abs();
    let high = (magnitude / 65536) as u8;
    let mid = (magnitude % 65536 / 256) as u8;
    let low = (magnitude % 256) as u8;

    if delta >= 0 {
        return [SIGN_POSITIVE, high, mid, low];
    }
    debug_assert!(high != SIGN_NEGATIVE);
    let fill_high = high == 0 && mid != SIGN_NEGATIVE;
    let fill_mid = high == 0 && mid == 0;
    [
        SIGN_NEGATIVE,
        if fill_high { SIGN_NEGATIVE } else { high },
        if fill_mid { SIGN_NEGATIVE } else { mid },
        low,
    ]
}

fn weighted(high: u8, mid: u8, low: u8) -> i32 {
    i32::from(high) * 65536 + i32::from(mid) * 256 + i32::from(low)
}

/// A three-axis position delta in its wire layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDelta {
    /// `0xFF` marks a negative axis.
    pub signedness: [u8; 3],
    /// Magnitude bytes weighted ×65536 (or fill).
    pub high: [u8; 3],
    /// Magnitude bytes weighted ×256 (or fill).
    pub mid: [u8; 3],
    /// Magnitude bytes weighted ×1.
    pub low: [u8; 3],
}

impl EncodedDelta {
    /// Size of an encoded delta in bytes.
    pub const LEN: usize = 12;

    /// Encodes `[dx, dy, dz]`.
    pub fn encode(delta: [i32; 3]) -> Result<Self, DeltaRangeError> {
        let mut axes = [[0u8; 4]; 3];
        for (slot, d) in axes.iter_mut().zip(delta) {
            *slot = encode_axis(d)?;
        }
        Ok(Self::from_axes(axes))
    }

    /// Encodes a delta whose axes are known to be in range.
    pub(crate) fn encode_in_range(delta: [i32; 3]) -> Self {
        Self::from_axes(delta.map(axis_bytes))
    }

    /// Decodes to `[dx, dy, dz]`.
    pub fn decode(&self) -> [i32; 3] {
        [0, 1, 2].map(|a| decode_axis([self.signedness[a], self.high[a], self.mid[a], self.low[a]]))
    }

    /// Parses the 12-byte wire layout.
    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        let vector = |start: usize| [bytes[start], bytes[start + 1], bytes[start + 2]];
        Self {
            signedness: vector(0),
            high: vector(3),
            mid: vector(6),
            low: vector(9),
        }
    }

    /// Produces the 12-byte wire layout.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        let vectors = [self.signedness, self.high, self.mid, self.low];
        for (i, vector) in vectors.iter().enumerate() {
            out[i * 3..i * 3 + 3].copy_from_slice(vector);
        }
        out
    }

    fn from_axes(axes: [AxisBytes; 3]) -> Self {
        let vector = |slot: usize| [axes[0][slot], axes[1][slot], axes[2][slot]];
        Self {
            signedness: vector(0),
            high: vector(1),
            mid: vector(2),
            low: vector(3),
        }
    }
}
