use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;
use thiserror::Error;

use crate::functions::generate_prime;
use crate::priv_key::PrivateKey;
use crate::pub_key::PublicKey;

/// Smallest accepted modulus size. Keys below 256 bits additionally leave
/// signature verification ill-defined, since the 256-bit message hash may
/// reach `n²`.
pub const MIN_KEY_BITS: usize = 160;

#[derive(Error, Debug)]
pub enum KeyGenError {
    #[error("key size too small: {0} < {MIN_KEY_BITS}")]
    BitSizeTooSmall(usize),
    #[error("key size must be a multiple of 8, got {0}")]
    BitSizeNotByteAligned(usize),
    #[error("primes must be distinct")]
    PrimesNotDistinct,
    #[error("prime generation failed: {0}")]
    PrimeGeneration(String),
    #[error("carmichael value has no inverse modulo n")]
    NoInverse,
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub pub_key: PublicKey,
    pub priv_key: PrivateKey,
}

impl KeyPair {
    /// Generate a fresh key pair with an exactly `bits`-bit modulus.
    ///
    /// Prime pairs are resampled until `p ≠ q` and their product reaches
    /// the full bit length.
    pub fn new(bits: usize) -> Result<Self, KeyGenError> {
        if bits < MIN_KEY_BITS {
            return Err(KeyGenError::BitSizeTooSmall(bits));
        }
        if bits % 8 != 0 {
            return Err(KeyGenError::BitSizeNotByteAligned(bits));
        }
        let half = bits / 2;
        let (p, q) = loop {
            let p = generate_prime(half)
                .map_err(|e| KeyGenError::PrimeGeneration(e.to_string()))?;
            let q = generate_prime(half)
                .map_err(|e| KeyGenError::PrimeGeneration(e.to_string()))?;
            if p == q {
                continue;
            }
            if ((&p * &q).bits() as usize) == bits {
                break (p, q);
            }
        };
        Self::from_primes(p, q)
    }

    /// Build a key pair from fixed primes. Used by `new` once sampling
    /// succeeds, and directly by tests and interop callers.
    pub fn from_primes(p: BigInt, q: BigInt) -> Result<Self, KeyGenError> {
        if p == q {
            return Err(KeyGenError::PrimesNotDistinct);
        }
        let n = &p * &q;
        let p_minus_one = &p - BigInt::one();
        let q_minus_one = &q - BigInt::one();
        let lambda = (&p_minus_one * &q_minus_one) / p_minus_one.gcd(&q_minus_one);

        let pub_key = PublicKey::new(n);

        // μ through the general route L(g^λ mod n²)⁻¹ mod n; with g = n + 1
        // this collapses to λ⁻¹ mod n.
        let u = pub_key.g.modpow(&lambda, pub_key.n_squared());
        let l = (u - BigInt::one()) / &pub_key.n;
        let mu = l.modinv(&pub_key.n).ok_or(KeyGenError::NoInverse)?;

        Ok(KeyPair {
            pub_key,
            priv_key: PrivateKey::new(lambda, mu),
        })
    }
}
