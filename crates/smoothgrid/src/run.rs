//! Run-length encoded voxel records.
//!
//! A run is 1–4 bytes:
//!
//! | Field | Present when |
//! |-------|--------------|
//! | flag | always |
//! | solid occupancy | flag has store-occupancy set (otherwise 1.0) |
//! | count | flag has store-count set |
//! | water occupancy | count byte is `0x00` |
//!
//! A count byte `n > 0` repeats the voxel `n + 1` times. A count of zero is
//! not a run length: it marks a single voxel followed by its water occupancy.
//! That is how the water channel was added without giving up material bits in
//! the flag byte, and it means voxels with water are never run-length
//! compressed.

use crate::error::DecodeError;
use crate::flags::VoxelFlags;
use crate::quantize::Occupancy;
use crate::reader::ByteReader;
use crate::voxel::Voxel;

/// Longest run a single record can express (count byte `0xFF`).
pub const MAX_RUN_LENGTH: u16 = 256;

/// Count byte value reserved for the water annotation.
const WATER_ANNOTATION: u8 = 0x00;

/// One decoded record: a voxel and how many times it repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelRun {
    pub voxel: Voxel,
    /// `1..=MAX_RUN_LENGTH`.
    pub repeat: u16,
}

impl VoxelRun {
    pub fn new(voxel: Voxel, repeat: u16) -> Self {
        Self { voxel, repeat }
    }

    pub(crate) fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let flags = VoxelFlags::from_byte(reader.read_u8()?);

        let solid = if flags.store_occupancy {
            Occupancy(reader.read_u8()?)
        } else {
            Occupancy::FULL
        };

        let (repeat, water) = if flags.store_count {
            match reader.read_u8()? {
                WATER_ANNOTATION => (1, Occupancy(reader.read_u8()?)),
                count => (u16::from(count) + 1, Occupancy::EMPTY),
            }
        } else {
            (1, Occupancy::EMPTY)
        };

        Ok(Self {
            voxel: Voxel::from_raw(flags.material, solid, water),
            repeat,
        })
    }

    /// Decodes a single run from the start of `bytes`, returning it and the
    /// number of bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let run = Self::read(&mut reader)?;
        Ok((run, reader.position()))
    }

    /// Appends the shortest record for this run.
    ///
    /// The voxel is written in canonical form. A voxel with water cannot be
    /// repeated; such a run must have `repeat == 1`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        debug_assert!((1..=MAX_RUN_LENGTH).contains(&self.repeat));
        let voxel = self.voxel.canonical();
        let has_water = !voxel.water().is_empty();
        debug_assert!(!has_water || self.repeat == 1, "water voxels cannot repeat");

        let flags = VoxelFlags {
            material: voxel.material(),
            store_occupancy: !voxel.solid().is_full(),
            store_count: has_water || self.repeat > 1,
        };
        out.push(flags.to_byte());
        if flags.store_occupancy {
            out.push(voxel.solid().0);
        }
        if has_water {
            out.push(WATER_ANNOTATION);
            out.push(voxel.water().0);
        } else if flags.store_count {
            out.push((self.repeat - 1) as u8);
        }
    }

    /// Encodes this run to a fresh buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4);
        self.encode_into(&mut out);
        out
    }
}

/// Splits a voxel sequence into the fewest runs the format allows.
///
/// Identical consecutive voxels merge up to [`MAX_RUN_LENGTH`]; voxels
/// carrying water always stand alone.
pub fn runs_of(voxels: &[Voxel]) -> Vec<VoxelRun> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < voxels.len() {
        let voxel = voxels[i].canonical();
        let mut repeat: u16 = 1;
        if voxel.water().is_empty() {
            while repeat < MAX_RUN_LENGTH {
                let next = voxels.get(i + repeat as usize).map(|v| v.canonical());
                if next != Some(voxel) {
                    break;
                }
                repeat += 1;
            }
        }
        runs.push(VoxelRun { voxel, repeat });
        i += repeat as usize;
    }
    runs
}
