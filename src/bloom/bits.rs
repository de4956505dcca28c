use super::{BloomError, BloomResult};
use bitvec::{order::Lsb0, vec::BitVec};

/// Fixed-length bit storage packed into `u32` words.
///
/// Bit `i` lives in word `i >> 5` under mask `1 << (i & 31)`. The length
/// never changes after construction and padding bits past the length in
/// the final word are always zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitArray {
    bits: BitVec<u32, Lsb0>,
}

impl BitArray {
    /// Zeroed array of `len` bits backed by `ceil(len / 32)` words.
    pub fn new(len: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, len),
        }
    }

    /// Rebuilds an array from its backing words.
    ///
    /// `words` must hold exactly `ceil(len / 32)` entries with no bit set at
    /// a position `>= len`.
    pub fn from_words(len: usize, words: Vec<u32>) -> BloomResult<Self> {
        let expected = len.div_ceil(u32::BITS as usize);
        if words.len() != expected {
            return Err(BloomError::SizeMismatch {
                what: "word count",
                left: expected,
                right: words.len(),
            });
        }

        let mut bits = BitVec::<u32, Lsb0>::from_vec(words);
        if bits[len..].any() {
            return Err(BloomError::InvalidParameter(format!(
                "Buffer has bits set at or beyond position {len}"
            )));
        }
        bits.truncate(len);

        Ok(Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Sets bit `index`. Setting an already-set bit is a no-op.
    pub fn set(&mut self, index: usize) -> BloomResult<()> {
        self.check_index(index)?;
        self.bits.set(index, true);
        Ok(())
    }

    pub fn get(&self, index: usize) -> BloomResult<bool> {
        self.check_index(index)?;
        Ok(self.bits[index])
    }

    /// Population count over all words.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// New array holding the bitwise OR of `self` and `other`.
    pub fn or(&self, other: &Self) -> BloomResult<Self> {
        self.zip_words(other, |a, b| a | b)
    }

    /// New array holding the bitwise AND of `self` and `other`.
    pub fn and(&self, other: &Self) -> BloomResult<Self> {
        self.zip_words(other, |a, b| a & b)
    }

    /// Backing words, `ceil(len / 32)` of them.
    pub fn words(&self) -> &[u32] {
        self.bits.as_raw_slice()
    }

    fn zip_words(
        &self,
        other: &Self,
        op: impl Fn(u32, u32) -> u32,
    ) -> BloomResult<Self> {
        if self.len() != other.len() {
            return Err(BloomError::SizeMismatch {
                what: "bit length",
                left: self.len(),
                right: other.len(),
            });
        }

        let words = self
            .words()
            .iter()
            .zip(other.words())
            .map(|(&a, &b)| op(a, b))
            .collect();
        let mut bits = BitVec::<u32, Lsb0>::from_vec(words);
        bits.truncate(self.len());

        Ok(Self { bits })
    }

    fn check_index(&self, index: usize) -> BloomResult<()> {
        if index >= self.len() {
            return Err(BloomError::IndexOutOfBounds {
                index,
                capacity: self.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let bits = BitArray::new(100);
        assert_eq!(bits.len(), 100);
        assert_eq!(bits.words().len(), 4);
        assert!(bits.words().iter().all(|&w| w == 0));
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_word_layout() {
        let mut bits = BitArray::new(64);
        bits.set(0).unwrap();
        bits.set(5).unwrap();
        bits.set(31).unwrap();
        bits.set(32).unwrap();
        bits.set(63).unwrap();

        assert_eq!(bits.words(), &[(1 << 0) | (1 << 5) | (1 << 31), 1 | (1 << 31)]);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut bits = BitArray::new(10);
        bits.set(3).unwrap();
        let before = bits.clone();
        bits.set(3).unwrap();
        assert_eq!(bits, before);
        assert_eq!(bits.count_ones(), 1);
        assert!(bits.get(3).unwrap());
        assert!(!bits.get(4).unwrap());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut bits = BitArray::new(10);
        assert_eq!(
            bits.set(10),
            Err(BloomError::IndexOutOfBounds {
                index: 10,
                capacity: 10
            })
        );
        assert!(bits.get(11).is_err());
    }

    #[test]
    fn test_or_and() {
        let mut a = BitArray::new(40);
        let mut b = BitArray::new(40);
        for i in [1, 7, 33] {
            a.set(i).unwrap();
        }
        for i in [7, 20, 39] {
            b.set(i).unwrap();
        }

        let or = a.or(&b).unwrap();
        let and = a.and(&b).unwrap();

        assert_eq!(or.len(), 40);
        assert_eq!(or.count_ones(), 5);
        for i in [1, 7, 20, 33, 39] {
            assert!(or.get(i).unwrap());
        }
        assert_eq!(and.count_ones(), 1);
        assert!(and.get(7).unwrap());

        // inputs untouched
        assert_eq!(a.count_ones(), 3);
        assert_eq!(b.count_ones(), 3);
    }

    #[test]
    fn test_or_length_mismatch() {
        let a = BitArray::new(64);
        let b = BitArray::new(65);
        assert_eq!(
            a.or(&b),
            Err(BloomError::SizeMismatch {
                what: "bit length",
                left: 64,
                right: 65
            })
        );
        assert!(a.and(&b).is_err());
    }

    #[test]
    fn test_from_words() {
        let bits = BitArray::from_words(40, vec![0b1010, 0x80]).unwrap();
        assert_eq!(bits.len(), 40);
        assert!(bits.get(1).unwrap());
        assert!(bits.get(3).unwrap());
        assert!(bits.get(39).unwrap());
        assert_eq!(bits.count_ones(), 3);
        assert_eq!(bits.words(), &[0b1010, 0x80]);
    }

    #[test]
    fn test_from_words_wrong_count() {
        assert_eq!(
            BitArray::from_words(40, vec![0]),
            Err(BloomError::SizeMismatch {
                what: "word count",
                left: 2,
                right: 1
            })
        );
    }

    #[test]
    fn test_from_words_rejects_padding_bits() {
        // bit 40 is past the end of a 40-bit array
        let result = BitArray::from_words(40, vec![0, 1 << 8]);
        assert!(matches!(result, Err(BloomError::InvalidParameter(_))));
    }
}
