//! Terrain material table: maps the 6-bit material index stored in every
//! voxel flag byte to a named material.
//!
//! Indices 0–22 are the materials Roblox defines today. Indices 23–63 are
//! reserved for materials added later; they are carried through decoding and
//! encoding untouched rather than rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Largest index the flag byte can hold.
pub const MAX_MATERIAL_INDEX: u8 = 0x3F;

/// Names of the defined materials, indexed by material index.
const MATERIAL_NAMES: [&str; 23] = [
    "Air",
    "Water",
    "Grass",
    "Slate",
    "Concrete",
    "Brick",
    "Sand",
    "WoodPlanks",
    "Rock",
    "Glacier",
    "Snow",
    "Sandstone",
    "Mud",
    "Basalt",
    "Ground",
    "CrackedLava",
    "Asphalt",
    "Cobblestone",
    "Ice",
    "LeafyGrass",
    "Salt",
    "Limestone",
    "Pavement",
];

/// A terrain material with a name defined by the format.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainMaterial {
    Air = 0x00,
    Water = 0x01,
    Grass = 0x02,
    Slate = 0x03,
    Concrete = 0x04,
    Brick = 0x05,
    Sand = 0x06,
    WoodPlanks = 0x07,
    Rock = 0x08,
    Glacier = 0x09,
    Snow = 0x0A,
    Sandstone = 0x0B,
    Mud = 0x0C,
    Basalt = 0x0D,
    Ground = 0x0E,
    CrackedLava = 0x0F,
    Asphalt = 0x10,
    Cobblestone = 0x11,
    Ice = 0x12,
    LeafyGrass = 0x13,
    Salt = 0x14,
    Limestone = 0x15,
    Pavement = 0x16,
}

impl TerrainMaterial {
    /// Every defined material in index order.
    pub const ALL: [TerrainMaterial; 23] = [
        Self::Air,
        Self::Water,
        Self::Grass,
        Self::Slate,
        Self::Concrete,
        Self::Brick,
        Self::Sand,
        Self::WoodPlanks,
        Self::Rock,
        Self::Glacier,
        Self::Snow,
        Self::Sandstone,
        Self::Mud,
        Self::Basalt,
        Self::Ground,
        Self::CrackedLava,
        Self::Asphalt,
        Self::Cobblestone,
        Self::Ice,
        Self::LeafyGrass,
        Self::Salt,
        Self::Limestone,
        Self::Pavement,
    ];

    /// Returns the material's index in the flag byte.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Returns the material's name as Roblox spells it.
    pub fn name(self) -> &'static str {
        MATERIAL_NAMES[self as usize]
    }

    /// Looks up a defined material by name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        MATERIAL_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| Self::ALL[i])
    }
}

/// Result of resolving a material index against the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialLookup {
    /// The index names a defined material.
    Named(TerrainMaterial),
    /// The index is reserved; the raw value is kept.
    Reserved(u8),
}

/// A 6-bit material index as stored on the wire.
///
/// This is an open set: any value in `0..=63` is valid, and only some of them
/// have names (see [`TerrainMaterial`]).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Material(u8);

impl Material {
    pub const AIR: Self = Self(0x00);
    pub const WATER: Self = Self(0x01);
    pub const GRASS: Self = Self(0x02);
    pub const SLATE: Self = Self(0x03);
    pub const CONCRETE: Self = Self(0x04);
    pub const BRICK: Self = Self(0x05);
    pub const SAND: Self = Self(0x06);
    pub const WOOD_PLANKS: Self = Self(0x07);
    pub const ROCK: Self = Self(0x08);
    pub const GLACIER: Self = Self(0x09);
    pub const SNOW: Self = Self(0x0A);
    pub const SANDSTONE: Self = Self(0x0B);
    pub const MUD: Self = Self(0x0C);
    pub const BASALT: Self = Self(0x0D);
    pub const GROUND: Self = Self(0x0E);
    pub const CRACKED_LAVA: Self = Self(0x0F);
    pub const ASPHALT: Self = Self(0x10);
    pub const COBBLESTONE: Self = Self(0x11);
    pub const ICE: Self = Self(0x12);
    pub const LEAFY_GRASS: Self = Self(0x13);
    pub const SALT: Self = Self(0x14);
    pub const LIMESTONE: Self = Self(0x15);
    pub const PAVEMENT: Self = Self(0x16);

    /// Creates a material from a raw index, or `None` if it does not fit in
    /// six bits.
    pub fn new(index: u8) -> Option<Self> {
        (index <= MAX_MATERIAL_INDEX).then_some(Self(index))
    }

    /// Creates a material from the low six bits of `bits`.
    pub(crate) fn from_bits(bits: u8) -> Self {
        Self(bits & MAX_MATERIAL_INDEX)
    }

    /// Returns the raw index.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Resolves this index against the material table.
    pub fn lookup(self) -> MaterialLookup {
        lookup(self.0)
    }

    /// Returns the named material, if this index has one.
    pub fn named(self) -> Option<TerrainMaterial> {
        match self.lookup() {
            MaterialLookup::Named(m) => Some(m),
            MaterialLookup::Reserved(_) => None,
        }
    }

    pub fn is_reserved(self) -> bool {
        self.named().is_none()
    }
}

impl From<TerrainMaterial> for Material {
    fn from(value: TerrainMaterial) -> Self {
        Self(value.index())
    }
}

impl TryFrom<u8> for Material {
    type Error = ModelError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(ModelError::InvalidMaterial(index))
    }
}

impl From<Material> for u8 {
    fn from(value: Material) -> Self {
        value.0
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lookup() {
            MaterialLookup::Named(m) => f.write_str(m.name()),
            MaterialLookup::Reserved(i) => write!(f, "Reserved({i})"),
        }
    }
}

/// Resolves a material index. Indices without a name come back as
/// [`MaterialLookup::Reserved`], never as an error.
pub fn lookup(index: u8) -> MaterialLookup {
    match TerrainMaterial::ALL.get(index as usize) {
        Some(&m) => MaterialLookup::Named(m),
        None => MaterialLookup::Reserved(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_indices() {
        for (i, m) in TerrainMaterial::ALL.iter().enumerate() {
            assert_eq!(m.index() as usize, i);
            assert_eq!(lookup(i as u8), MaterialLookup::Named(*m));
        }
    }

    #[test]
    fn test_known_indices() {
        assert_eq!(Material::AIR.named(), Some(TerrainMaterial::Air));
        assert_eq!(Material::WATER.named(), Some(TerrainMaterial::Water));
        assert_eq!(Material::PAVEMENT.named(), Some(TerrainMaterial::Pavement));
        assert_eq!(Material::from(TerrainMaterial::Grass), Material::GRASS);
    }

    #[test]
    fn test_reserved_indices_are_kept() {
        for i in 23..=MAX_MATERIAL_INDEX {
            let m = Material::new(i).unwrap();
            assert_eq!(m.lookup(), MaterialLookup::Reserved(i));
            assert!(m.is_reserved());
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn test_index_must_fit_six_bits() {
        assert!(Material::new(63).is_some());
        assert!(Material::new(64).is_none());
        assert_eq!(Material::from_bits(0xC2), Material::GRASS);
        assert_eq!(Material::try_from(63u8), Ok(Material::new(63).unwrap()));
        assert_eq!(Material::try_from(64u8), Err(ModelError::InvalidMaterial(64)));
    }

    #[test]
    fn test_deserialize_checks_index() {
        assert_eq!(ron::from_str::<Material>("22").unwrap(), Material::PAVEMENT);
        assert_eq!(ron::from_str::<Material>("63").unwrap().index(), 63);
        assert!(ron::from_str::<Material>("64").is_err());
        assert!(ron::from_str::<Material>("200").is_err());
        assert_eq!(ron::to_string(&Material::ICE).unwrap(), "18");
    }

    #[test]
    fn test_names_roundtrip() {
        for m in TerrainMaterial::ALL {
            assert_eq!(TerrainMaterial::from_name(m.name()), Some(m));
        }
        assert_eq!(TerrainMaterial::from_name("Obsidian"), None);
        assert_eq!(Material::LEAFY_GRASS.to_string(), "LeafyGrass");
        assert_eq!(Material::new(40).unwrap().to_string(), "Reserved(40)");
    }
}
