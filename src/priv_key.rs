use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pub_key::PublicKey;

#[derive(Error, Debug)]
pub enum PrivKeyError {
    #[error("ciphertext out of range: must satisfy 0 <= c < n^2")]
    CiphertextOutOfRange,
}

/// Paillier private key: the Carmichael value `λ = lcm(p−1, q−1)` and the
/// decryption constant `μ = L(g^λ mod n²)⁻¹ mod n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    #[serde(with = "crate::serialize::b64")]
    pub lambda: BigInt,
    #[serde(with = "crate::serialize::b64")]
    pub mu: BigInt,
}

impl PrivateKey {
    pub fn new(lambda: BigInt, mu: BigInt) -> Self {
        PrivateKey { lambda, mu }
    }

    /// Recover the plaintext: `m = L(c^λ mod n²) · μ mod n`.
    pub fn decrypt(&self, c: &BigInt, pk: &PublicKey) -> Result<BigInt, PrivKeyError> {
        if c.sign() == Sign::Minus || *c >= *pk.n_squared() {
            return Err(PrivKeyError::CiphertextOutOfRange);
        }
        let u = c.modpow(&self.lambda, pk.n_squared());
        let l = (u - BigInt::one()) / &pk.n;
        Ok((l * &self.mu).mod_floor(&pk.n))
    }
}
