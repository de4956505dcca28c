use super::{
    BitArray, BloomError, BloomFilterConfig, BloomFilterOps, BloomFilterStats,
    BloomParams, BloomResult, BulkBloomFilterOps,
};
use crate::hash::{Key, hash_pair, probe_indices};
use tracing::debug;

/// Classic Bloom filter: an `m`-bit array probed at `k` positions per key.
///
/// Bits only ever go from 0 to 1. There is no removal; [`union`] and
/// [`intersection`] allocate new filters instead of touching their inputs.
///
/// # Concurrency
///
/// [`insert`] takes `&mut self`, every query takes `&self`. Any number of
/// readers may share a filter (for example through an `Arc`) while nobody
/// writes. Mixing a writer with readers needs outside synchronization,
/// typically a `RwLock`.
///
/// [`union`]: BloomFilter::union
/// [`intersection`]: BloomFilter::intersection
/// [`insert`]: BloomFilterOps::insert
#[derive(Clone, PartialEq, Eq)]
pub struct BloomFilter {
    params: BloomParams,
    bits: BitArray,
}

impl BloomFilter {
    /// Empty filter with `bit_vector_size` bits and `num_hashes` probes.
    pub fn new(bit_vector_size: usize, num_hashes: usize) -> BloomResult<Self> {
        let params = BloomParams {
            bit_vector_size,
            num_hashes,
        };
        params.validate()?;

        debug!(bit_vector_size, num_hashes, "Creating bloom filter");
        Ok(Self {
            params,
            bits: BitArray::new(bit_vector_size),
        })
    }

    /// Empty filter sized for `config.capacity` elements at
    /// `config.false_positive_rate`.
    pub fn from_config(config: BloomFilterConfig) -> BloomResult<Self> {
        config.validate()?;

        let params = BloomParams::from(&config);
        debug!(
            capacity = config.capacity,
            false_positive_rate = config.false_positive_rate,
            bit_vector_size = params.bit_vector_size,
            num_hashes = params.num_hashes,
            "Sized bloom filter from target error"
        );
        Self::new(params.bit_vector_size, params.num_hashes)
    }

    /// Shorthand for [`BloomFilter::from_config`].
    pub fn with_target_error(
        capacity: usize,
        target_error_rate: f64,
    ) -> BloomResult<Self> {
        Self::from_config(BloomFilterConfig {
            capacity,
            false_positive_rate: target_error_rate,
        })
    }

    /// Rebuilds a filter bit-for-bit from its exported backing words.
    pub fn from_buffer(
        bit_vector_size: usize,
        num_hashes: usize,
        words: Vec<u32>,
    ) -> BloomResult<Self> {
        let params = BloomParams {
            bit_vector_size,
            num_hashes,
        };
        params.validate()?;
        let bits = BitArray::from_words(bit_vector_size, words)?;

        debug!(
            bit_vector_size,
            num_hashes,
            set_bits = bits.count_ones(),
            "Restored bloom filter from buffer"
        );
        Ok(Self { params, bits })
    }

    pub fn params(&self) -> BloomParams {
        self.params
    }

    pub fn bits(&self) -> &BitArray {
        &self.bits
    }

    /// Backing words in export order.
    pub fn words(&self) -> &[u32] {
        self.bits.words()
    }

    /// Filter whose bits are the OR of both inputs. Equivalent to a filter
    /// that received every insert made into either input.
    pub fn union(left: &Self, right: &Self) -> BloomResult<Self> {
        Self::check_compatible(left, right)?;
        let bits = left.bits.or(&right.bits)?;

        debug!(
            bit_vector_size = left.params.bit_vector_size,
            set_bits = bits.count_ones(),
            "Computed bloom filter union"
        );
        Ok(Self {
            params: left.params,
            bits,
        })
    }

    /// Filter whose bits are the AND of both inputs. Contains every key
    /// inserted into both; may report keys that were in only one input.
    pub fn intersection(left: &Self, right: &Self) -> BloomResult<Self> {
        Self::check_compatible(left, right)?;
        let bits = left.bits.and(&right.bits)?;

        debug!(
            bit_vector_size = left.params.bit_vector_size,
            set_bits = bits.count_ones(),
            "Computed bloom filter intersection"
        );
        Ok(Self {
            params: left.params,
            bits,
        })
    }

    fn check_compatible(left: &Self, right: &Self) -> BloomResult<()> {
        if left.params.bit_vector_size != right.params.bit_vector_size {
            return Err(BloomError::SizeMismatch {
                what: "bit vector size",
                left: left.params.bit_vector_size,
                right: right.params.bit_vector_size,
            });
        }
        if left.params.num_hashes != right.params.num_hashes {
            return Err(BloomError::SizeMismatch {
                what: "hash count",
                left: left.params.num_hashes,
                right: right.params.num_hashes,
            });
        }
        Ok(())
    }
}

impl BloomFilterOps for BloomFilter {
    fn insert<'a>(&mut self, item: impl Into<Key<'a>>) -> BloomResult<()> {
        let (h1, h2) = hash_pair(item)?;
        for idx in probe_indices(
            h1,
            h2,
            self.params.num_hashes,
            self.params.bit_vector_size,
        ) {
            self.bits.set(idx)?;
        }
        Ok(())
    }

    fn contains<'a>(&self, item: impl Into<Key<'a>>) -> BloomResult<bool> {
        let (h1, h2) = hash_pair(item)?;
        for idx in probe_indices(
            h1,
            h2,
            self.params.num_hashes,
            self.params.bit_vector_size,
        ) {
            if !self.bits.get(idx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl BulkBloomFilterOps for BloomFilter {
    fn insert_bulk<'a, I>(&mut self, items: I) -> BloomResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Key<'a>>,
    {
        items.into_iter().try_for_each(|item| self.insert(item))
    }

    fn contains_bulk<'a, I>(&self, items: I) -> BloomResult<Vec<bool>>
    where
        I: IntoIterator,
        I::Item: Into<Key<'a>>,
    {
        items.into_iter().map(|item| self.contains(item)).collect()
    }
}

impl BloomFilterStats for BloomFilter {
    fn bit_vector_size(&self) -> usize {
        self.params.bit_vector_size
    }

    fn num_hashes(&self) -> usize {
        self.params.num_hashes
    }

    fn count_bits(&self) -> usize {
        self.bits.count_ones()
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ bit_vector_size: {}, num_hashes: {}, set_bits: {} }}",
            self.params.bit_vector_size,
            self.params.num_hashes,
            self.bits.count_ones()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_degenerate_shape() {
        assert!(matches!(
            BloomFilter::new(0, 4),
            Err(BloomError::InvalidParameter(_))
        ));
        assert!(matches!(
            BloomFilter::new(1000, 0),
            Err(BloomError::InvalidParameter(_))
        ));
        assert!(BloomFilter::new(1, 1).is_ok());
    }

    #[test]
    fn test_insert_sets_k_bits() {
        let mut filter = BloomFilter::new(1024, 4).unwrap();
        filter.insert(0).unwrap();
        assert_eq!(filter.count_bits(), 4);
        assert!(filter.contains(0).unwrap());
    }

    #[test]
    fn test_single_bit_filter() {
        let mut filter = BloomFilter::new(1, 3).unwrap();
        assert!(!filter.contains("anything").unwrap());
        filter.insert("x").unwrap();
        assert_eq!(filter.count_bits(), 1);
        // every key maps to bit 0
        assert!(filter.contains("anything").unwrap());
        assert_eq!(filter.estimated_count(), f64::INFINITY);
    }

    #[test]
    fn test_empty_filter_estimates() {
        let filter = BloomFilter::new(1000, 4).unwrap();
        assert_eq!(filter.count_bits(), 0);
        assert_eq!(filter.fill_ratio(), 0.0);
        assert_eq!(filter.estimated_count(), 0.0);
        assert_eq!(filter.estimated_false_positive_rate(), 0.0);
    }

    #[test]
    fn test_with_target_error_shape() {
        let filter = BloomFilter::with_target_error(100, 1e-5).unwrap();
        assert_eq!(filter.bit_vector_size(), 2397);
        assert_eq!(filter.num_hashes(), 17);
        assert_eq!(filter.words().len(), 75);
    }

    #[test]
    fn test_debug_is_compact() {
        let mut filter = BloomFilter::new(1024, 4).unwrap();
        filter.insert(0).unwrap();
        assert_eq!(
            format!("{filter:?}"),
            "BloomFilter { bit_vector_size: 1024, num_hashes: 4, set_bits: 4 }"
        );
    }

    #[test]
    fn test_union_rejects_hash_count_mismatch() {
        let a = BloomFilter::new(100, 3).unwrap();
        let b = BloomFilter::new(100, 4).unwrap();
        assert_eq!(
            BloomFilter::union(&a, &b),
            Err(BloomError::SizeMismatch {
                what: "hash count",
                left: 3,
                right: 4
            })
        );
    }
}
