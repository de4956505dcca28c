use crate::bloom::{BloomError, BloomResult};
use fnv::FnvHasher;
use murmur3::murmur3_32;
use std::hash::Hasher;
use std::io::Cursor;

/// A value that can be inserted into or tested against a Bloom filter.
///
/// Each variant has its own byte encoding:
///
/// - `Text` hashes the UTF-8 bytes of the string, so every scalar value
///   contributes in full and the empty string is a valid key.
/// - `Integer` hashes the little-endian bytes of the `i64`, never its
///   decimal text.
///
/// `Key::Integer(42)` and `Key::Text("42")` are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    Text(&'a str),
    Integer(i64),
}

impl Key<'_> {
    fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match self {
            Key::Text(text) => f(text.as_bytes()),
            Key::Integer(value) => f(&value.to_le_bytes()),
        }
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(value: &'a str) -> Self {
        Key::Text(value)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(value: &'a String) -> Self {
        Key::Text(value.as_str())
    }
}

macro_rules! impl_integer_key {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key<'_> {
                fn from(value: $ty) -> Self {
                    Key::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_integer_key!(i8, i16, i32, i64, u8, u16, u32);

pub(crate) fn hash_murmur32(key: &[u8]) -> BloomResult<u32> {
    let mut cursor = Cursor::new(key);
    murmur3_32(&mut cursor, 0).map_err(|e| BloomError::HashFailure(e.to_string()))
}

pub(crate) fn hash_fnv32(key: &[u8]) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish() as u32
}

/// Maps a key to the two seeds used for double hashing.
///
/// `h1` is Murmur3 (x86, 32-bit, seed 0) and `h2` is FNV-1a truncated to
/// 32 bits with the low bit forced on. An odd `h2` is coprime with any
/// power-of-two bit length, so the probe sequence never repeats a
/// position before `m` probes.
pub fn hash_pair<'a>(key: impl Into<Key<'a>>) -> BloomResult<(u32, u32)> {
    let key: Key<'a> = key.into();
    key.with_bytes(|bytes| {
        let h1 = hash_murmur32(bytes)?;
        let h2 = hash_fnv32(bytes) | 1;
        Ok((h1, h2))
    })
}

/// Kirsch-Mitzenmacher probe positions: `(h1 + i * h2) mod m` for
/// `i` in `0..num_hashes`, evaluated in wrapping `u32` arithmetic.
///
/// `bit_vector_size` must be in `1..=u32::MAX` and `num_hashes` at most
/// `u32::MAX`; filters enforce tighter bounds at construction.
pub fn probe_indices(
    h1: u32,
    h2: u32,
    num_hashes: usize,
    bit_vector_size: usize,
) -> impl Iterator<Item = usize> {
    debug_assert!(bit_vector_size > 0 && bit_vector_size <= u32::MAX as usize);
    debug_assert!(num_hashes <= u32::MAX as usize);
    let m = bit_vector_size as u32;
    (0..num_hashes as u32)
        .map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}

/// Bits needed for `n` elements at false positive rate `fpr`, rounded up.
pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as usize
}

/// Hash count for `n` elements in `m` bits, rounded to nearest, at least 1.
pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    let k = ((m as f64 / n as f64) * std::f64::consts::LN_2).round() as usize;
    k.max(1)
}

/// Theoretical false positive rate `(1 - e^(-k n / m))^k` after `n`
/// distinct insertions. Returns `0.0` for an empty filter and `NaN` for
/// a degenerate shape.
pub fn expected_false_positive_rate(m: usize, k: usize, n: usize) -> f64 {
    if m == 0 || k == 0 {
        return f64::NAN;
    }
    if n == 0 {
        return 0.0;
    }
    let k = k as f64;
    let exponent = -k * n as f64 / m as f64;
    (1.0 - exponent.exp()).powf(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur_known_values() {
        assert_eq!(hash_murmur32(b"").unwrap(), 0);
        assert_eq!(hash_murmur32(b"hello").unwrap(), 613153351);
    }

    #[test]
    fn test_fnv_known_values() {
        // FNV-1a 64-bit offset basis, low 32 bits
        assert_eq!(hash_fnv32(b""), 0x8422_2325);
        assert_eq!(hash_fnv32(b"hello"), 2158673163);
    }

    #[test]
    fn test_hash_pair_is_deterministic() {
        assert_eq!(hash_pair("hello").unwrap(), (613153351, 2158673163));
        assert_eq!(hash_pair("hello").unwrap(), hash_pair("hello").unwrap());
        assert_eq!(hash_pair("").unwrap(), (0, 2216829733));
    }

    #[test]
    fn test_second_seed_is_odd() {
        for key in ["", "a", "b", "Bess", "Jane", "\u{0100}"] {
            let (_, h2) = hash_pair(key).unwrap();
            assert_eq!(h2 & 1, 1, "h2 for {key:?} should be odd");
        }
        for value in 0..1000i64 {
            let (_, h2) = hash_pair(value).unwrap();
            assert_eq!(h2 & 1, 1);
        }
    }

    #[test]
    fn test_integer_keys_are_not_text() {
        assert_ne!(hash_pair(42).unwrap(), hash_pair("42").unwrap());
        assert_eq!(hash_pair(42).unwrap(), hash_pair(42u8).unwrap());
        assert_eq!(hash_pair(42).unwrap(), (1871679806, 931781359));
    }

    #[test]
    fn test_trailing_character_changes_pair() {
        let base = "`Twas brillig, and the slithy toves";
        let extended = format!("{base}\n");
        assert_ne!(hash_pair(base).unwrap(), hash_pair(&extended).unwrap());
        assert_ne!(
            hash_pair("\u{0100}").unwrap(),
            hash_pair("\u{0101}").unwrap()
        );
    }

    #[test]
    fn test_probe_indices() {
        let indices: Vec<usize> = probe_indices(10, 3, 4, 7).collect();
        assert_eq!(indices, vec![3, 6, 2, 5]);
    }

    #[test]
    fn test_probe_indices_wrap_in_u32() {
        let indices: Vec<usize> = probe_indices(u32::MAX, 2, 2, 10).collect();
        // u32::MAX % 10 == 5, (u32::MAX + 2) wraps to 1
        assert_eq!(indices, vec![5, 1]);
    }

    #[test]
    fn test_probe_indices_in_range() {
        let (h1, h2) = hash_pair("range").unwrap();
        for m in [1, 2, 3, 31, 32, 33, 1000, 1 << 20] {
            assert!(probe_indices(h1, h2, 16, m).all(|i| i < m));
        }
    }

    #[test]
    fn test_optimal_sizes() {
        assert_eq!(optimal_bit_vector_size(100, 1e-5), 2397);
        assert_eq!(optimal_num_hashes(100, 2397), 17);
        assert_eq!(optimal_bit_vector_size(1000, 0.01), 9586);
        assert_eq!(optimal_num_hashes(1000, 9586), 7);
    }

    #[test]
    fn test_optimal_num_hashes_floor() {
        assert_eq!(optimal_bit_vector_size(1, 0.5), 2);
        assert_eq!(optimal_num_hashes(1, 2), 1);
        assert_eq!(optimal_num_hashes(1000, 10), 1);
    }

    #[test]
    fn test_expected_false_positive_rate() {
        assert_eq!(expected_false_positive_rate(2397, 17, 0), 0.0);
        assert!(expected_false_positive_rate(0, 17, 10).is_nan());
        let rate = expected_false_positive_rate(2397, 17, 100);
        assert!((rate - 1e-5).abs() < 1e-6, "rate was {rate}");
        assert!(
            expected_false_positive_rate(2397, 17, 200)
                > expected_false_positive_rate(2397, 17, 100)
        );
    }
}
