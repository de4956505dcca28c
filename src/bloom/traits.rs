use super::BloomResult;
use crate::hash::Key;

/// Core membership operations
pub trait BloomFilterOps {
    /// Set the bits for `item`. Repeated inserts leave the bits unchanged.
    fn insert<'a>(&mut self, item: impl Into<Key<'a>>) -> BloomResult<()>;

    /// `true` if every probe bit for `item` is set. Never false for an
    /// item previously inserted into this filter.
    fn contains<'a>(&self, item: impl Into<Key<'a>>) -> BloomResult<bool>;
}

pub trait BulkBloomFilterOps {
    fn insert_bulk<'a, I>(&mut self, items: I) -> BloomResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Key<'a>>;

    fn contains_bulk<'a, I>(&self, items: I) -> BloomResult<Vec<bool>>
    where
        I: IntoIterator,
        I::Item: Into<Key<'a>>;
}

/// Shape and fill statistics, plus the estimates derived from them.
pub trait BloomFilterStats {
    /// Bit-vector length `m`
    fn bit_vector_size(&self) -> usize;

    /// Probes per operation `k`
    fn num_hashes(&self) -> usize;

    /// Number of set bits `X`
    fn count_bits(&self) -> usize;

    /// `X / m`
    fn fill_ratio(&self) -> f64 {
        self.count_bits() as f64 / self.bit_vector_size() as f64
    }

    /// Estimated distinct insertions, `-(m / k) * ln(1 - X / m)`.
    ///
    /// Accuracy falls off as the fill ratio approaches 1; a fully set
    /// filter yields `f64::INFINITY`.
    fn estimated_count(&self) -> f64 {
        let m = self.bit_vector_size() as f64;
        let k = self.num_hashes() as f64;
        let x = self.count_bits() as f64;
        if x >= m {
            tracing::warn!(
                bit_vector_size = self.bit_vector_size(),
                "filter is saturated, cardinality estimate is unbounded"
            );
            return f64::INFINITY;
        }
        -(m / k) * (-x / m).ln_1p()
    }

    /// Live false positive estimate `(X / m)^k` for the current fill.
    fn estimated_false_positive_rate(&self) -> f64 {
        let fill = self.fill_ratio();
        if fill >= 1.0 {
            tracing::warn!(
                bit_vector_size = self.bit_vector_size(),
                "filter is saturated, every query reports possibly present"
            );
        }
        fill.powf(self.num_hashes() as f64)
    }
}
