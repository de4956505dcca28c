use super::{BloomError, BloomResult};
use crate::hash::{optimal_bit_vector_size, optimal_num_hashes};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Capacity-driven sizing request: expected distinct elements and the
/// false positive rate to hold at that count.
#[derive(Clone, Debug, Builder, Serialize, Deserialize, PartialEq)]
#[builder(pattern = "owned")]
pub struct BloomFilterConfig {
    /// Expected number of distinct elements
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Target false positive rate (0.0 to 1.0, exclusive)
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,
}

impl BloomFilterConfig {
    pub fn validate(&self) -> BloomResult<()> {
        if self.capacity == 0 {
            return Err(BloomError::InvalidParameter(
                "Capacity must be > 0".into(),
            ));
        }
        // written so that NaN is rejected as well
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(BloomError::InvalidParameter(format!(
                "False positive rate must be between 0 and 1, got {}",
                self.false_positive_rate
            )));
        }
        Ok(())
    }
}

/// Upper bound on `k`. Optimal sizing only exceeds it for false positive
/// rates below about 1e-77.
pub const MAX_NUM_HASHES: usize = 256;

/// Filter shape: bit-vector length `m` and hash count `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomParams {
    pub bit_vector_size: usize,
    pub num_hashes: usize,
}

impl BloomParams {
    pub fn validate(&self) -> BloomResult<()> {
        if self.bit_vector_size == 0 {
            return Err(BloomError::InvalidParameter(
                "Bit vector size must be > 0".into(),
            ));
        }
        if self.bit_vector_size > u32::MAX as usize {
            return Err(BloomError::InvalidParameter(format!(
                "Bit vector size must be <= {}, got {}",
                u32::MAX,
                self.bit_vector_size
            )));
        }
        if self.num_hashes == 0 {
            return Err(BloomError::InvalidParameter(
                "Number of hashes must be > 0".into(),
            ));
        }
        if self.num_hashes > MAX_NUM_HASHES {
            return Err(BloomError::InvalidParameter(format!(
                "Number of hashes must be <= {}, got {}",
                MAX_NUM_HASHES, self.num_hashes
            )));
        }
        Ok(())
    }

    /// Size of the backing buffer in 32-bit words.
    pub fn word_count(&self) -> usize {
        self.bit_vector_size.div_ceil(u32::BITS as usize)
    }
}

impl From<&BloomFilterConfig> for BloomParams {
    fn from(config: &BloomFilterConfig) -> Self {
        let bit_vector_size =
            optimal_bit_vector_size(config.capacity, config.false_positive_rate);
        let num_hashes = optimal_num_hashes(config.capacity, bit_vector_size);

        Self {
            bit_vector_size,
            num_hashes,
        }
    }
}
