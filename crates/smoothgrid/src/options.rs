//! Tuning knobs for blob decoding and encoding.

use serde::{Deserialize, Serialize};

/// Controls when the codec spreads work across threads.
///
/// Output is identical either way; only throughput changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Allow decoding/encoding chunks on the rayon thread pool. Default: true.
    pub parallel: bool,
    /// Minimum number of chunks before the parallel path is used. Default: 8.
    pub parallel_min_chunks: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_min_chunks: 8,
        }
    }
}

impl CodecOptions {
    /// Options that never use the thread pool.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub(crate) fn use_parallel(&self, chunk_count: usize) -> bool {
        self.parallel && chunk_count >= self.parallel_min_chunks.max(2)
    }
}
