//! The SmoothGrid blob: header plus a sequence of chunks.
//!
//! ## Binary Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 1 | Magic byte `0x01` |
//! | 1 | 1 | Chunk size exponent (`0..=8`, Roblox writes 5) |
//! | 2 | … | Chunks until the input ends |
//!
//! Each chunk's position is a delta from the chunk before it (the first is
//! relative to the origin). Chunks are expected in ascending (X, Y, Z) order,
//! but that is a producer convention and is not checked when decoding.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::chunk::{
    Chunk, DEFAULT_CHUNK_SIZE_LOG2, MAX_CHUNK_SIZE_LOG2, VoxelCoordinates, check_size_log2,
    read_position,
};
use crate::error::{DecodeError, DecodeErrorKind, ModelError};
use crate::index::{expand_parallel, expand_sequential, index_chunks};
use crate::options::CodecOptions;
use crate::position::ChunkPosition;
use crate::reader::ByteReader;
use crate::voxel::Voxel;

/// First byte of every SmoothGrid blob.
pub const MAGIC: u8 = 0x01;

/// Reads the magic byte and chunk size exponent.
pub(crate) fn read_header(reader: &mut ByteReader<'_>) -> Result<u8, DecodeError> {
    let magic = reader.read_u8()?;
    if magic != MAGIC {
        return Err(DecodeError::new(DecodeErrorKind::InvalidMagic(magic), 0));
    }
    let size_log2 = reader.read_u8()?;
    if size_log2 > MAX_CHUNK_SIZE_LOG2 {
        return Err(DecodeError::new(
            DecodeErrorKind::UnsupportedChunkSize(size_log2),
            1,
        ));
    }
    Ok(size_log2)
}

/// A decoded terrain voxel world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlobFields")]
pub struct Blob {
    chunk_size_log2: u8,
    chunks: Vec<Chunk>,
}

impl Blob {
    /// Creates an empty blob whose chunks are `2^chunk_size_log2` voxels on a side.
    pub fn new(chunk_size_log2: u8) -> Result<Self, ModelError> {
        Ok(Self {
            chunk_size_log2: check_size_log2(chunk_size_log2)?,
            chunks: Vec::new(),
        })
    }

    pub fn chunk_size_log2(&self) -> u8 {
        self.chunk_size_log2
    }

    /// Side length of every chunk in voxels.
    pub fn chunk_size(&self) -> usize {
        1 << self.chunk_size_log2
    }

    /// Chunks in encode order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Appends a chunk after the existing ones, leaving ordering to the caller.
    pub fn push_chunk(&mut self, chunk: Chunk) -> Result<(), ModelError> {
        self.check_size(&chunk)?;
        self.chunks.push(chunk);
        Ok(())
    }

    /// Inserts a chunk at its sorted (X, Y, Z) place, replacing and returning
    /// any chunk already at that position.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Result<Option<Chunk>, ModelError> {
        self.check_size(&chunk)?;
        let position = chunk.position();
        if let Some(existing) = self.chunks.iter_mut().find(|c| c.position() == position) {
            return Ok(Some(std::mem::replace(existing, chunk)));
        }
        let at = self.chunks.partition_point(|c| c.position() < position);
        self.chunks.insert(at, chunk);
        Ok(None)
    }

    /// Finds the chunk at `position`.
    pub fn chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.position() == position)
    }

    /// Mutable voxels of the chunk at `position`.
    ///
    /// Chunks are only reachable through their voxels so that a chunk's size
    /// and position stay fixed once it belongs to the blob.
    pub fn chunk_voxels_mut(&mut self, position: ChunkPosition) -> Option<&mut [Voxel]> {
        self.chunks
            .iter_mut()
            .find(|c| c.position() == position)
            .map(Chunk::voxels_mut)
    }

    /// Sets one voxel of the chunk at `position`. Returns `false` if there is
    /// no such chunk.
    pub fn set_voxel(
        &mut self,
        position: ChunkPosition,
        coords: VoxelCoordinates,
        voxel: Voxel,
    ) -> bool {
        match self.chunks.iter_mut().find(|c| c.position() == position) {
            Some(chunk) => {
                chunk.set_voxel(coords, voxel);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the chunk at `position`.
    pub fn remove_chunk(&mut self, position: ChunkPosition) -> Option<Chunk> {
        let i = self.chunks.iter().position(|c| c.position() == position)?;
        Some(self.chunks.remove(i))
    }

    /// Decodes a blob with default [`CodecOptions`].
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(bytes, &CodecOptions::default())
    }

    /// Decodes a blob. Any structural problem aborts the whole decode.
    pub fn decode_with(bytes: &[u8], options: &CodecOptions) -> Result<Self, DecodeError> {
        let blob = if options.parallel {
            let index = index_chunks(bytes)?;
            let chunks = if options.use_parallel(index.entries.len()) {
                expand_parallel(bytes, &index)?
            } else {
                expand_sequential(bytes, &index)?
            };
            Self {
                chunk_size_log2: index.chunk_size_log2,
                chunks,
            }
        } else {
            Self::decode_sequential(bytes)?
        };

        tracing::debug!(
            chunks = blob.chunks.len(),
            chunk_size_log2 = blob.chunk_size_log2,
            bytes = bytes.len(),
            "decoded SmoothGrid blob"
        );
        Ok(blob)
    }

    fn decode_sequential(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let chunk_size_log2 = read_header(&mut reader)?;

        let mut chunks = Vec::new();
        let mut position = ChunkPosition::ORIGIN;
        while !reader.is_empty() {
            position = read_position(&mut reader, position)?;
            let chunk = Chunk::read_body(&mut reader, position, chunk_size_log2)?;
            tracing::trace!(?position, end = reader.position(), "decoded chunk");
            chunks.push(chunk);
        }

        Ok(Self {
            chunk_size_log2,
            chunks,
        })
    }

    /// Encodes with default [`CodecOptions`].
    pub fn encode(&self) -> Vec<u8> {
        self.encode_with(&CodecOptions::default())
    }

    /// Encodes the header and every chunk in order. Voxels are written in
    /// their canonical form.
    pub fn encode_with(&self, options: &CodecOptions) -> Vec<u8> {
        // ~256 bytes for a uniform 32³ chunk; double it.
        let mut data = Vec::with_capacity(2 + self.chunks.len() * 512);
        data.extend([MAGIC, self.chunk_size_log2]);

        let mut previous = ChunkPosition::ORIGIN;
        if options.use_parallel(self.chunks.len()) {
            let bodies: Vec<Vec<u8>> = self
                .chunks
                .par_iter()
                .map(|chunk| {
                    let mut body = Vec::with_capacity(512);
                    chunk.write_body(&mut body);
                    body
                })
                .collect();
            for (chunk, body) in self.chunks.iter().zip(bodies) {
                data.extend_from_slice(&previous.delta_to(chunk.position()).to_bytes());
                data.extend_from_slice(&body);
                previous = chunk.position();
            }
        } else {
            for chunk in &self.chunks {
                chunk.write(previous, &mut data);
                previous = chunk.position();
            }
        }

        tracing::debug!(
            chunks = self.chunks.len(),
            bytes = data.len(),
            "encoded SmoothGrid blob"
        );
        data
    }

    fn check_size(&self, chunk: &Chunk) -> Result<(), ModelError> {
        if chunk.size_log2() != self.chunk_size_log2 {
            return Err(ModelError::ChunkSizeMismatch {
                expected: self.chunk_size_log2,
                actual: chunk.size_log2(),
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct BlobFields {
    chunk_size_log2: u8,
    chunks: Vec<Chunk>,
}

impl TryFrom<BlobFields> for Blob {
    type Error = ModelError;

    fn try_from(fields: BlobFields) -> Result<Self, Self::Error> {
        let mut blob = Self::new(fields.chunk_size_log2)?;
        for chunk in fields.chunks {
            blob.push_chunk(chunk)?;
        }
        Ok(blob)
    }
}

impl Default for Blob {
    fn default() -> Self {
        Self {
            chunk_size_log2: DEFAULT_CHUNK_SIZE_LOG2,
            chunks: Vec::new(),
        }
    }
}
