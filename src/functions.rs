use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{rngs::OsRng, RngCore};
use rug::integer::{IsPrime, Order};
use thiserror::Error;

/// Miller-Rabin iteration count used for all primality checks.
const PRIME_CHECK_ROUNDS: u32 = 40;

#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("random number generation failed")]
    RandomNumberGeneration,
    #[error("invalid bit length: {0}")]
    InvalidBitLength(usize),
}

/// Uniform random integer in `[0, 2^bits)`.
pub fn random_int(bits: usize) -> Result<BigInt, FunctionError> {
    let max = BigInt::one() << bits;
    random_mod(&max, &mut OsRng)
}

/// Uniform random integer in `[0, n)` by rejection sampling.
pub fn random_mod(n: &BigInt, rng: &mut impl RngCore) -> Result<BigInt, FunctionError> {
    if n <= &BigInt::zero() {
        return Err(FunctionError::RandomNumberGeneration);
    }
    let mut bytes = vec![0u8; (n.bits() as usize + 7) / 8];
    let mut result;
    loop {
        rng.fill_bytes(&mut bytes);
        result = BigInt::from_bytes_be(Sign::Plus, &bytes);
        if result < *n {
            break;
        }
    }
    Ok(result)
}

/// Uniform random unit of `Z*_n`: `r` in `[1, n)` with `gcd(r, n) = 1`.
pub fn random_unit_mod(n: &BigInt, rng: &mut impl RngCore) -> Result<BigInt, FunctionError> {
    loop {
        let r = random_mod(n, rng)?;
        if !r.is_zero() && r.gcd(n).is_one() {
            return Ok(r);
        }
    }
}

/// Probable prime with exactly `bits` bits.
///
/// The top bit is forced so the product of two such primes has `2·bits`
/// or `2·bits − 1` bits, and the low bit so the candidate is odd.
pub fn generate_prime(bits: usize) -> Result<BigInt, FunctionError> {
    if bits < 8 {
        return Err(FunctionError::InvalidBitLength(bits));
    }
    loop {
        let mut candidate = random_int(bits)?;
        candidate.set_bit(bits as u64 - 1, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate) {
            return Ok(candidate);
        }
    }
}

pub fn is_probable_prime(n: &BigInt) -> bool {
    let (_, bytes) = n.to_bytes_be();
    let candidate = rug::Integer::from_digits(&bytes, Order::Msf);
    candidate.is_probably_prime(PRIME_CHECK_ROUNDS) != IsPrime::No
}
