//! Dense voxel chunks and their wire encoding.
//!
//! On the wire a chunk is a 12-byte position delta (see [`crate::delta`])
//! followed by voxel runs until exactly `size³` voxels have been produced.
//! There is no length prefix; a chunk ends when its voxel budget is full.
//!
//! Voxels are ordered ascending by Y, then Z, then X (X varies fastest).

use serde::{Deserialize, Serialize};

use crate::delta::EncodedDelta;
use crate::error::{DecodeError, DecodeErrorKind, ModelError};
use crate::position::ChunkPosition;
use crate::reader::ByteReader;
use crate::run::{MAX_RUN_LENGTH, VoxelRun, runs_of};
use crate::voxel::Voxel;

/// Chunk size exponent Roblox writes (32³ voxels).
pub const DEFAULT_CHUNK_SIZE_LOG2: u8 = 5;

/// Largest chunk size exponent the format allows.
pub const MAX_CHUNK_SIZE_LOG2: u8 = 8;

/// Number of voxels in a chunk with the given size exponent.
pub fn chunk_volume(size_log2: u8) -> usize {
    1usize << (3 * u32::from(size_log2))
}

pub(crate) fn check_size_log2(size_log2: u8) -> Result<u8, ModelError> {
    if size_log2 > MAX_CHUNK_SIZE_LOG2 {
        return Err(ModelError::UnsupportedChunkSize(size_log2));
    }
    Ok(size_log2)
}

/// Position of a voxel inside its chunk, each component in `0..size`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelCoordinates {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl VoxelCoordinates {
    pub fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }
}

/// A cube of `size³` voxels at a chunk-space position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChunkFields")]
pub struct Chunk {
    position: ChunkPosition,
    size_log2: u8,
    voxels: Vec<Voxel>,
}

impl Chunk {
    /// Creates a chunk of air.
    pub fn new(position: ChunkPosition, size_log2: u8) -> Result<Self, ModelError> {
        Self::filled(position, size_log2, Voxel::AIR)
    }

    /// Creates a chunk with every voxel set to `base`.
    pub fn filled(position: ChunkPosition, size_log2: u8, base: Voxel) -> Result<Self, ModelError> {
        let size_log2 = check_size_log2(size_log2)?;
        Ok(Self {
            position,
            size_log2,
            voxels: vec![base; chunk_volume(size_log2)],
        })
    }

    /// Wraps a dense voxel array in (Y, Z, X) order. The length must be the
    /// volume of a supported chunk size.
    pub fn from_voxels(position: ChunkPosition, voxels: Vec<Voxel>) -> Result<Self, ModelError> {
        let size_log2 = (0..=MAX_CHUNK_SIZE_LOG2)
            .find(|&s| chunk_volume(s) == voxels.len())
            .ok_or(ModelError::InvalidVoxelCount(voxels.len()))?;
        Ok(Self {
            position,
            size_log2,
            voxels,
        })
    }

    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    pub fn size_log2(&self) -> u8 {
        self.size_log2
    }

    /// Side length in voxels.
    pub fn size(&self) -> usize {
        1 << self.size_log2
    }

    /// Total voxel count (`size³`).
    pub fn volume(&self) -> usize {
        self.voxels.len()
    }

    /// All voxels in (Y, Z, X) order.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Mutable view of all voxels. The count is fixed.
    pub fn voxels_mut(&mut self) -> &mut [Voxel] {
        &mut self.voxels
    }

    /// Converts coordinates to an index into [`Chunk::voxels`], or `None`
    /// if they fall outside the chunk.
    pub fn linear_index(&self, coords: VoxelCoordinates) -> Option<usize> {
        let size = self.size();
        let (x, y, z) = (coords.x as usize, coords.y as usize, coords.z as usize);
        if x >= size || y >= size || z >= size {
            return None;
        }
        Some(x + z * size + y * size * size)
    }

    /// Returns the voxel at `coords`, or `None` if out of bounds.
    pub fn voxel(&self, coords: VoxelCoordinates) -> Option<Voxel> {
        self.linear_index(coords).map(|i| self.voxels[i])
    }

    /// Sets the voxel at `coords`.
    ///
    /// No-op with a warning log if the coordinates are out of bounds.
    pub fn set_voxel(&mut self, coords: VoxelCoordinates, voxel: Voxel) {
        match self.linear_index(coords) {
            Some(i) => self.voxels[i] = voxel,
            None => tracing::warn!(
                "Chunk::set_voxel out of bounds: ({}, {}, {})",
                coords.x,
                coords.y,
                coords.z
            ),
        }
    }

    /// Sets every voxel to `voxel`.
    pub fn fill(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
    }

    /// Iterates over `(coordinates, voxel)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelCoordinates, Voxel)> + '_ {
        let size = self.size();
        self.voxels.iter().enumerate().map(move |(i, &v)| {
            let coords = VoxelCoordinates {
                x: (i % size) as u16,
                z: (i / size % size) as u16,
                y: (i / (size * size)) as u16,
            };
            (coords, v)
        })
    }

    /// Reads the run stream of a chunk whose position is already known.
    pub(crate) fn read_body(
        reader: &mut ByteReader<'_>,
        position: ChunkPosition,
        size_log2: u8,
    ) -> Result<Self, DecodeError> {
        let volume = chunk_volume(size_log2);
        // Every run record is at least one byte, so the input bounds the
        // voxel count before any run is read.
        let bound = reader
            .remaining()
            .saturating_mul(usize::from(MAX_RUN_LENGTH));
        let mut voxels = Vec::with_capacity(volume.min(bound));
        scan_runs(reader, volume, |run| {
            voxels.extend(std::iter::repeat_n(run.voxel, run.repeat as usize));
        })?;
        Ok(Self {
            position,
            size_log2,
            voxels,
        })
    }

    /// Appends this chunk's run stream (without the position delta).
    pub(crate) fn write_body(&self, out: &mut Vec<u8>) {
        for run in runs_of(&self.voxels) {
            run.encode_into(out);
        }
    }

    /// Appends the position delta from `previous` and the run stream.
    pub(crate) fn write(&self, previous: ChunkPosition, out: &mut Vec<u8>) {
        out.extend_from_slice(&previous.delta_to(self.position).to_bytes());
        self.write_body(out);
    }
}

/// Deserialized form of [`Chunk`], checked by [`Chunk::from_voxels`].
#[derive(Deserialize)]
struct ChunkFields {
    position: ChunkPosition,
    voxels: Vec<Voxel>,
}

impl TryFrom<ChunkFields> for Chunk {
    type Error = ModelError;

    fn try_from(fields: ChunkFields) -> Result<Self, Self::Error> {
        Self::from_voxels(fields.position, fields.voxels)
    }
}

/// Reads a chunk's position delta and resolves it against `previous`.
pub(crate) fn read_position(
    reader: &mut ByteReader<'_>,
    previous: ChunkPosition,
) -> Result<ChunkPosition, DecodeError> {
    let start = reader.position();
    let delta = EncodedDelta::from_bytes(reader.read_array()?);
    previous
        .offset_by(delta.decode())
        .map_err(|kind| DecodeError::new(kind, start))
}

/// Reads runs until exactly `volume` voxels are covered, handing each run to
/// `sink`. A run that would overshoot is an error at the run's first byte.
pub(crate) fn scan_runs(
    reader: &mut ByteReader<'_>,
    volume: usize,
    mut sink: impl FnMut(VoxelRun),
) -> Result<(), DecodeError> {
    let mut filled = 0usize;
    while filled < volume {
        let start = reader.position();
        let run = VoxelRun::read(reader)?;
        let remaining = volume - filled;
        if run.repeat as usize > remaining {
            return Err(DecodeError::new(
                DecodeErrorKind::VoxelBudgetExceeded {
                    repeat: run.repeat,
                    remaining,
                },
                start,
            ));
        }
        filled += run.repeat as usize;
        sink(run);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn origin_chunk(size_log2: u8) -> Chunk {
        Chunk::new(ChunkPosition::ORIGIN, size_log2).unwrap()
    }

    #[test]
    fn test_volume_per_exponent() {
        assert_eq!(chunk_volume(0), 1);
        assert_eq!(chunk_volume(5), 32_768);
        assert_eq!(chunk_volume(8), 16_777_216);
    }

    #[test]
    fn test_unsupported_size_rejected() {
        assert_eq!(
            Chunk::new(ChunkPosition::ORIGIN, 9),
            Err(ModelError::UnsupportedChunkSize(9))
        );
    }

    #[test]
    fn test_from_voxels_infers_size() {
        let chunk = Chunk::from_voxels(ChunkPosition::ORIGIN, vec![Voxel::AIR; 64]).unwrap();
        assert_eq!(chunk.size_log2(), 2);
        assert_eq!(chunk.size(), 4);
        assert_eq!(
            Chunk::from_voxels(ChunkPosition::ORIGIN, vec![Voxel::AIR; 65]),
            Err(ModelError::InvalidVoxelCount(65))
        );
    }

    #[test]
    fn test_storage_order_is_y_z_x() {
        let mut chunk = origin_chunk(2);
        let rock = Voxel::new(Material::ROCK, 1.0);
        chunk.set_voxel(VoxelCoordinates::new(1, 0, 0), rock);
        chunk.set_voxel(VoxelCoordinates::new(0, 0, 1), rock);
        chunk.set_voxel(VoxelCoordinates::new(0, 1, 0), rock);
        assert_eq!(chunk.voxels()[1], rock);
        assert_eq!(chunk.voxels()[4], rock);
        assert_eq!(chunk.voxels()[16], rock);
        assert_eq!(chunk.voxels().iter().filter(|&&v| v == rock).count(), 3);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut chunk = origin_chunk(1);
        assert_eq!(chunk.voxel(VoxelCoordinates::new(2, 0, 0)), None);
        chunk.set_voxel(VoxelCoordinates::new(0, 5, 0), Voxel::FULL_WATER);
        assert!(chunk.voxels().iter().all(|&v| v == Voxel::AIR));
    }

    #[test]
    fn test_iter_matches_linear_index() {
        let chunk = origin_chunk(2);
        for (i, (coords, _)) in chunk.iter().enumerate() {
            assert_eq!(chunk.linear_index(coords), Some(i));
        }
    }

    #[test]
    fn test_body_roundtrip() {
        let mut chunk = origin_chunk(3);
        chunk.set_voxel(
            VoxelCoordinates::new(3, 3, 3),
            Voxel::with_water(Material::MUD, 0.4, 0.2),
        );
        chunk.set_voxel(
            VoxelCoordinates::new(7, 7, 7),
            Voxel::new(Material::new(50).unwrap(), 1.0),
        );
        let mut bytes = Vec::new();
        chunk.write_body(&mut bytes);

        let mut reader = ByteReader::new(&bytes);
        let decoded = Chunk::read_body(&mut reader, ChunkPosition::ORIGIN, 3).unwrap();
        assert!(reader.is_empty());
        assert_eq!(decoded, chunk);
    }

    #[test]
    fn test_uniform_chunk_body_size() {
        let mut bytes = Vec::new();
        origin_chunk(5).write_body(&mut bytes);
        // 32768 / 256 full-length runs of two bytes each.
        assert_eq!(bytes.len(), 128 * 2);
    }

    #[test]
    fn test_overshooting_run_is_rejected() {
        // 8-voxel chunk: a 6-run then a 3-run.
        let bytes = [0x80, 0x05, 0x80, 0x02];
        let mut reader = ByteReader::new(&bytes);
        let err = Chunk::read_body(&mut reader, ChunkPosition::ORIGIN, 1).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::VoxelBudgetExceeded {
                repeat: 3,
                remaining: 2
            }
        );
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_short_body_is_truncated() {
        let bytes = [0x80, 0x05];
        let mut reader = ByteReader::new(&bytes);
        let err = Chunk::read_body(&mut reader, ChunkPosition::ORIGIN, 1).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TruncatedInput);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_large_chunk_with_short_input() {
        let mut reader = ByteReader::new(&[0x80]);
        let err = Chunk::read_body(&mut reader, ChunkPosition::ORIGIN, 8).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TruncatedInput);
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let air = "(material:0,solid:255,water:0)";
        let text = "(position:(1,-2,3),voxels:[(material:40,solid:128,water:0)])";
        let chunk = ron::from_str::<Chunk>(text).unwrap();
        assert_eq!(chunk.size_log2(), 0);
        assert_eq!(chunk.position().to_array(), [1, -2, 3]);
        assert_eq!(chunk.voxels()[0].material().index(), 40);

        let not_a_cube = format!("(position:(0,0,0),voxels:[{air},{air}])");
        let err = ron::from_str::<Chunk>(&not_a_cube).unwrap_err();
        assert!(err.to_string().contains("do not form a supported chunk"));

        // 200 would spill into the store-occupancy and store-count bits.
        let wide_material = "(position:(0,0,0),voxels:[(material:200,solid:255,water:0)])";
        let err = ron::from_str::<Chunk>(wide_material).unwrap_err();
        assert!(err.to_string().contains("exceeds 63"));

        let far = format!("(position:(0,262145,0),voxels:[{air}])");
        assert!(ron::from_str::<Chunk>(&far).is_err());
    }

    #[test]
    fn test_serialized_chunk_roundtrips() {
        let mut chunk = origin_chunk(1);
        chunk.set_voxel(
            VoxelCoordinates::new(1, 0, 1),
            Voxel::with_water(Material::SNOW, 0.3, 0.5),
        );
        let text = ron::to_string(&chunk).unwrap();
        assert_eq!(ron::from_str::<Chunk>(&text).unwrap(), chunk);
    }
}
