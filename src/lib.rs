//! Classic Bloom filter with cardinality and error-rate estimation.
//!
//! A Bloom filter answers "has this value possibly been added?" with no
//! false negatives and a tunable false positive rate.
//!
//! HowTo:
//!    * Storage: a fixed `m`-bit array packed into `u32` words, all zero at start.
//!    * Hashing: each key yields two seeds, `h1` (Murmur3) and `h2` (FNV-1a).
//!    * Probes: the `k` positions are `(h1 + i * h2) mod m` for `i` in `0..k`
//!      (Kirsch-Mitzenmacher double hashing, wrapping `u32` arithmetic).
//!
//! Insertion:
//!     * Set the `k` probe bits of the key. Bits never go back to zero.
//! Query:
//!     * The key is possibly present iff all `k` probe bits are set.
//! Estimation:
//!     * With `X` set bits, distinct insertions ≈ `-(m / k) * ln(1 - X / m)`.
//!     * The live false positive rate ≈ `(X / m)^k`.
//! Composition:
//!     * Union ORs the bit arrays, intersection ANDs them. Both need equal
//!       `m` and `k` and produce a new filter.
//!
//! Sizing for `n` elements at rate `p`: `m = ceil(-n ln p / (ln 2)^2)`,
//! `k = max(1, round(m / n * ln 2))`.
//!
//! ```
//! use classic_bloom_rs::{BloomFilter, BloomFilterOps, BloomFilterStats};
//!
//! let mut filter = BloomFilter::with_target_error(1000, 0.01)?;
//! filter.insert("Bess")?;
//! filter.insert(42)?;
//! assert!(filter.contains("Bess")?);
//! assert!(filter.contains(42)?);
//! assert!(filter.estimated_count() > 1.5);
//! # Ok::<(), classic_bloom_rs::BloomError>(())
//! ```
//!
//! Since 32 bit hashes are used, `m` is capped at `u32::MAX` bits.
//! `k` is capped at [`MAX_NUM_HASHES`].

pub mod bloom;
pub mod common;
#[cfg(feature = "cli")]
pub mod document;
mod hash;

pub use bloom::error::Result;
pub use bloom::{
    BitArray, BloomError, BloomFilter, BloomFilterConfig,
    BloomFilterConfigBuilder, BloomFilterOps, BloomFilterStats, BloomParams,
    BloomResult, BulkBloomFilterOps, FilterSnapshot, MAX_NUM_HASHES,
};
pub use hash::{
    Key, expected_false_positive_rate, hash_pair, optimal_bit_vector_size,
    optimal_num_hashes, probe_indices,
};
