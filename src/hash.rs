use num_bigint::{BigInt, Sign};
use num_traits::One;
use sha2::{Digest, Sha256};

/// Width of the digest in bits; also fixes the Fiat-Shamir challenge modulus.
pub const HASH_BITS: usize = 256;

/// SHA-256 over the concatenated big-endian magnitudes of `values`,
/// read back as a non-negative 256-bit integer.
///
/// Prover and verifier must feed the sequence in the same order.
pub fn hash_bigints(values: &[&BigInt]) -> BigInt {
    let mut hash = Sha256::new();
    for value in values {
        let (_, bytes) = value.to_bytes_be();
        hash.update(&bytes);
    }
    let digest = hash.finalize();
    BigInt::from_bytes_be(Sign::Plus, &digest)
}

/// The challenge modulus `2^256`, equal to the hash output width.
pub fn challenge_modulus() -> BigInt {
    BigInt::one() << HASH_BITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_hash_deterministic() {
        let a = BigInt::from(12345u32);
        let b = BigInt::from(67890u32);
        let h1 = hash_bigints(&[&a, &b]);
        let h2 = hash_bigints(&[&a, &b]);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_order_sensitive() {
        let a = BigInt::from(12345u32);
        let b = BigInt::from(67890u32);
        assert_ne!(hash_bigints(&[&a, &b]), hash_bigints(&[&b, &a]));
    }

    #[test]
    fn test_hash_below_challenge_modulus() {
        let h = hash_bigints(&[&BigInt::from(42u32)]);
        assert!(h >= BigInt::zero());
        assert!(h < challenge_modulus());
    }

    #[test]
    fn test_hash_single_bit_sensitivity() {
        let m = BigInt::from(0xdeadbeefu64);
        let flipped = &m ^ BigInt::one();
        assert_ne!(hash_bigints(&[&m]), hash_bigints(&[&flipped]));
    }
}
