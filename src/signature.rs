use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::hash_bigints;
use crate::priv_key::PrivateKey;
use crate::pub_key::PublicKey;

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("key does not admit a signing exponent")]
    InvalidKey,
}

/// Paillier signature over the 256-bit hash of a message.
///
/// Verification reduces the hash into `Z_{n²}`, so signatures are only
/// collision-meaningful for moduli of at least 256 bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "crate::serialize::b64")]
    pub s1: BigInt,
    #[serde(with = "crate::serialize::b64")]
    pub s2: BigInt,
}

impl Signature {
    /// Sign `m`: `s1 = L(h^λ mod n²)·μ mod n`,
    /// `s2 = (h·g^{−s1})^{n⁻¹ mod λ} mod n` with `h = H(m)`.
    pub fn create(m: &BigInt, pk: &PublicKey, sk: &PrivateKey) -> Result<Self, SignatureError> {
        let h = hash_bigints(&[m]);

        let u = h.modpow(&sk.lambda, pk.n_squared());
        let l = (u - BigInt::one()) / &pk.n;
        let s1 = (l * &sk.mu).mod_floor(&pk.n);

        let n_inv = pk.n.modinv(&sk.lambda).ok_or(SignatureError::InvalidKey)?;
        let g_to_s1_inv = pk
            .g
            .modpow(&s1, &pk.n)
            .modinv(&pk.n)
            .ok_or(SignatureError::InvalidKey)?;
        let base = (h * g_to_s1_inv).mod_floor(&pk.n);
        let s2 = base.modpow(&n_inv, &pk.n);

        Ok(Signature { s1, s2 })
    }

    /// Accept iff `g^{s1} · s2^n ≡ H(m) (mod n²)`. Fails closed: malformed
    /// components return `false` rather than an error.
    pub fn verify(&self, m: &BigInt, pk: &PublicKey) -> bool {
        if self.s1.sign() == Sign::Minus || self.s2.sign() == Sign::Minus {
            return false;
        }
        let n_squared = pk.n_squared();
        let h = hash_bigints(&[m]).mod_floor(n_squared);
        let lhs = (pk.g.modpow(&self.s1, n_squared) * self.s2.modpow(&pk.n, n_squared))
            .mod_floor(n_squared);
        lhs == h
    }
}
