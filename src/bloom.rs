//! Classic Bloom filter: bit storage, sizing, estimation and composition
pub mod bits;
pub mod config;
pub mod error;
pub mod filter;
pub mod snapshot;
pub mod traits;

pub use bits::BitArray;
pub use config::{
    BloomFilterConfig, BloomFilterConfigBuilder, BloomParams, MAX_NUM_HASHES,
};
pub use error::{BloomError, BloomResult};
pub use filter::BloomFilter;
pub use snapshot::FilterSnapshot;
pub use traits::{BloomFilterOps, BloomFilterStats, BulkBloomFilterOps};
