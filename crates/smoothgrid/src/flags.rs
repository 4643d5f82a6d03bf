//! The voxel flag byte that opens every run record.
//!
//! ```text
//! bit  7   6   5 4 3 2 1 0
//!    +---+---+-------------+
//!    | C | O |  material   |
//!    +---+---+-------------+
//! ```
//!
//! `O` (store occupancy): a solid occupancy byte follows.
//! `C` (store count): a count byte follows.

use crate::material::{MAX_MATERIAL_INDEX, Material};

const STORE_OCCUPANCY: u8 = 0b0100_0000;
const STORE_COUNT: u8 = 0b1000_0000;

/// Unpacked voxel flag byte. Every byte value is a valid flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelFlags {
    /// Material index in the low six bits.
    pub material: Material,
    /// An occupancy byte follows the flag.
    pub store_occupancy: bool,
    /// A count byte follows the flag (and the occupancy byte, if any).
    pub store_count: bool,
}

impl VoxelFlags {
    /// Unpacks a flag byte.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            material: Material::from_bits(byte),
            store_occupancy: byte & STORE_OCCUPANCY != 0,
            store_count: byte & STORE_COUNT != 0,
        }
    }

    /// Packs the flags back into a byte.
    pub fn to_byte(self) -> u8 {
        debug_assert!(self.material.index() <= MAX_MATERIAL_INDEX);
        let mut byte = self.material.index() & MAX_MATERIAL_INDEX;
        if self.store_occupancy {
            byte |= STORE_OCCUPANCY;
        }
        if self.store_count {
            byte |= STORE_COUNT;
        }
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_byte_roundtrips() {
        for b in 0..=u8::MAX {
            assert_eq!(VoxelFlags::from_byte(b).to_byte(), b);
        }
    }

    #[test]
    fn test_bit_positions() {
        let flags = VoxelFlags::from_byte(0xC2);
        assert_eq!(flags.material, Material::GRASS);
        assert!(flags.store_occupancy);
        assert!(flags.store_count);

        let flags = VoxelFlags::from_byte(0x41);
        assert_eq!(flags.material, Material::WATER);
        assert!(flags.store_occupancy);
        assert!(!flags.store_count);

        let flags = VoxelFlags::from_byte(0x80);
        assert_eq!(flags.material, Material::AIR);
        assert!(!flags.store_occupancy);
        assert!(flags.store_count);
    }
}
