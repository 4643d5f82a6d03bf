//! Codec for the Roblox terrain "SmoothGrid" blob: chunked voxel data with
//! run-length compression, quantized occupancies, and a water channel.
//!
//! ```
//! use smoothgrid::{Blob, Chunk, ChunkPosition, Material, Voxel, VoxelCoordinates};
//!
//! let mut chunk = Chunk::new(ChunkPosition::new(1, 0, -2)?, 5)?;
//! chunk.set_voxel(VoxelCoordinates::new(0, 0, 0), Voxel::new(Material::GRASS, 0.5));
//!
//! let mut blob = Blob::default();
//! blob.insert_chunk(chunk)?;
//!
//! let bytes = smoothgrid::encode(&blob);
//! assert_eq!(smoothgrid::decode(&bytes)?, blob);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod blob;
pub mod chunk;
pub mod delta;
pub mod error;
pub mod flags;
pub mod index;
pub mod material;
pub mod options;
pub mod position;
pub mod quantize;
mod reader;
pub mod run;
pub mod voxel;

pub use blob::{Blob, MAGIC};
pub use chunk::{Chunk, DEFAULT_CHUNK_SIZE_LOG2, MAX_CHUNK_SIZE_LOG2, VoxelCoordinates};
pub use delta::EncodedDelta;
pub use error::{Axis, DecodeError, DecodeErrorKind, DeltaRangeError, ModelError};
pub use flags::VoxelFlags;
pub use index::{BlobIndex, ChunkIndexEntry, index_chunks};
pub use material::{Material, MaterialLookup, TerrainMaterial};
pub use options::CodecOptions;
pub use position::{ChunkPosition, MAX_CHUNK_COORD};
pub use quantize::Occupancy;
pub use run::VoxelRun;
pub use voxel::Voxel;

/// Decodes a SmoothGrid blob.
pub fn decode(bytes: &[u8]) -> Result<Blob, DecodeError> {
    Blob::decode(bytes)
}

/// Encodes a blob to SmoothGrid bytes.
pub fn encode(blob: &Blob) -> Vec<u8> {
    blob.encode()
}
