//! A single terrain voxel: a material plus solid and water occupancy.

use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::quantize::Occupancy;

/// The smallest unit of terrain.
///
/// Occupancies are kept quantized. Constructors normalise the value into the
/// canonical form the encoder writes; [`Voxel::from_raw`] keeps whatever it is
/// given, which is what the decoder uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voxel {
    material: Material,
    solid: Occupancy,
    water: Occupancy,
}

impl Voxel {
    /// Fully occupied air: what empty space decodes to.
    pub const AIR: Self = Self {
        material: Material::AIR,
        solid: Occupancy::FULL,
        water: Occupancy::EMPTY,
    };

    /// A voxel completely filled with water.
    pub const FULL_WATER: Self = Self {
        material: Material::WATER,
        solid: Occupancy::FULL,
        water: Occupancy::EMPTY,
    };

    /// Creates a voxel with no water. Equivalent to `Terrain:WriteVoxels`.
    pub fn new(material: Material, solid_occupancy: f32) -> Self {
        Self::with_water(material, solid_occupancy, 0.0)
    }

    /// Creates a voxel with a water channel. Equivalent to
    /// `Terrain:WriteVoxelChannels`. Fractions are clamped to `[0, 1]`.
    pub fn with_water(material: Material, solid_occupancy: f32, water_occupancy: f32) -> Self {
        Self::from_raw(
            material,
            Occupancy::from_fraction(solid_occupancy),
            Occupancy::from_fraction(water_occupancy),
        )
        .canonical()
    }

    /// Creates a voxel from quantized values without normalising it.
    pub fn from_raw(material: Material, solid: Occupancy, water: Occupancy) -> Self {
        Self {
            material,
            solid,
            water,
        }
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Quantized solid occupancy.
    pub fn solid(&self) -> Occupancy {
        self.solid
    }

    /// Quantized water occupancy.
    pub fn water(&self) -> Occupancy {
        self.water
    }

    pub fn solid_occupancy(&self) -> f32 {
        self.solid.fraction()
    }

    pub fn water_occupancy(&self) -> f32 {
        self.water.fraction()
    }

    /// Replaces the material and re-normalises the occupancies, since the
    /// water rule depends on the material.
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        *self = self.canonical();
    }

    /// Replaces both occupancies (clamped to `[0, 1]`) and re-normalises.
    pub fn set_occupancy(&mut self, solid_occupancy: f32, water_occupancy: f32) {
        self.solid = Occupancy::from_fraction(solid_occupancy);
        self.water = Occupancy::from_fraction(water_occupancy);
        *self = self.canonical();
    }

    /// Returns the form this voxel is written in.
    ///
    /// - No solid and full water is the same as fully occupied water.
    /// - A fully occupied non-air voxel holds no water.
    pub fn canonical(self) -> Self {
        if self.solid.is_empty() && self.water.is_full() {
            return Self::FULL_WATER;
        }
        if self.solid.is_full() && self.material != Material::AIR {
            return Self {
                water: Occupancy::EMPTY,
                ..self
            };
        }
        self
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical() == *self
    }
}

impl Default for Voxel {
    fn default() -> Self {
        Self::AIR
    }
}
