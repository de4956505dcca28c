use super::{BloomFilter, BloomResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Portable `(m, k, words)` export of a filter.
///
/// `words` is the flat sequence of backing `u32` values, bit `i` in word
/// `i >> 5` at mask `1 << (i & 31)`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct FilterSnapshot {
    #[serde(rename = "m")]
    pub bit_vector_size: usize,
    #[serde(rename = "k")]
    pub num_hashes: usize,
    pub words: Vec<u32>,
}

impl BloomFilter {
    pub fn to_snapshot(&self) -> FilterSnapshot {
        let params = self.params();
        FilterSnapshot {
            bit_vector_size: params.bit_vector_size,
            num_hashes: params.num_hashes,
            words: self.words().to_vec(),
        }
    }

    pub fn from_snapshot(snapshot: FilterSnapshot) -> BloomResult<Self> {
        Self::from_buffer(
            snapshot.bit_vector_size,
            snapshot.num_hashes,
            snapshot.words,
        )
    }

    /// Compact binary encoding of [`BloomFilter::to_snapshot`].
    pub fn to_bytes(&self) -> BloomResult<Vec<u8>> {
        let bytes = bincode::encode_to_vec(
            self.to_snapshot(),
            bincode::config::standard(),
        )?;
        debug!(bytes = bytes.len(), "Encoded bloom filter snapshot");
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> BloomResult<Self> {
        let (snapshot, _): (FilterSnapshot, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Self::from_snapshot(snapshot)
    }
}
