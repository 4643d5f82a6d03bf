//! Chunk index for decoding chunks concurrently.
//!
//! Chunk boundaries are only found by counting voxels run by run, and each
//! position is a delta from the one before, so locating chunks is a single
//! sequential pass. That pass is cheap: it reads run headers but never
//! materialises voxel arrays. Once every chunk's byte range and absolute
//! position are known, the chunks can be expanded independently.

use rayon::prelude::*;

use crate::blob::read_header;
use crate::chunk::{Chunk, chunk_volume, read_position, scan_runs};
use crate::error::DecodeError;
use crate::position::ChunkPosition;
use crate::reader::ByteReader;

/// Location of one chunk inside a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkIndexEntry {
    /// Absolute chunk-space position.
    pub position: ChunkPosition,
    /// Offset of the chunk's position delta.
    pub offset: usize,
    /// Offset of the first voxel run.
    pub runs_offset: usize,
    /// Offset one past the chunk's last byte.
    pub end: usize,
}

/// Header and chunk locations of a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobIndex {
    pub chunk_size_log2: u8,
    pub entries: Vec<ChunkIndexEntry>,
}

/// Validates the whole blob and records where each chunk lives.
///
/// Every error `decode` can report is found here, at the same offset.
pub fn index_chunks(bytes: &[u8]) -> Result<BlobIndex, DecodeError> {
    let mut reader = ByteReader::new(bytes);
    let chunk_size_log2 = read_header(&mut reader)?;
    let volume = chunk_volume(chunk_size_log2);

    let mut entries = Vec::new();
    let mut position = ChunkPosition::ORIGIN;
    while !reader.is_empty() {
        let offset = reader.position();
        position = read_position(&mut reader, position)?;
        let runs_offset = reader.position();
        scan_runs(&mut reader, volume, |_| {})?;
        entries.push(ChunkIndexEntry {
            position,
            offset,
            runs_offset,
            end: reader.position(),
        });
    }

    Ok(BlobIndex {
        chunk_size_log2,
        entries,
    })
}

/// Expands every indexed chunk on the rayon pool, preserving blob order.
pub(crate) fn expand_parallel(bytes: &[u8], index: &BlobIndex) -> Result<Vec<Chunk>, DecodeError> {
    index
        .entries
        .par_iter()
        .map(|entry| expand_entry(bytes, index.chunk_size_log2, entry))
        .collect()
}

/// Expands every indexed chunk on the calling thread.
pub(crate) fn expand_sequential(
    bytes: &[u8],
    index: &BlobIndex,
) -> Result<Vec<Chunk>, DecodeError> {
    index
        .entries
        .iter()
        .map(|entry| expand_entry(bytes, index.chunk_size_log2, entry))
        .collect()
}

fn expand_entry(
    bytes: &[u8],
    size_log2: u8,
    entry: &ChunkIndexEntry,
) -> Result<Chunk, DecodeError> {
    let mut reader = ByteReader::at(&bytes[..entry.end], entry.runs_offset);
    Chunk::read_body(&mut reader, entry.position, size_log2)
}
