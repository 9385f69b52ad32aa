use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::functions::{random_int, random_unit_mod};
use crate::hash::{challenge_modulus, hash_bigints};
use crate::zk_proof::MembershipProof;

#[derive(Error, Debug)]
pub enum PubKeyError {
    #[error("plaintext out of range: must satisfy 0 <= m < n")]
    PlaintextOutOfRange,
    #[error("message is not an element of the valid set")]
    NotInValidSet,
    #[error("element has no inverse modulo n^2")]
    NoInverse,
    #[error("random number generation failed: {0}")]
    RandomNumber(String),
}

/// Paillier public key with the fixed generator `g = n + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PublicKeyRepr", into = "PublicKeyRepr")]
pub struct PublicKey {
    pub n: BigInt,
    pub g: BigInt,
    n_squared: BigInt,
}

/// Wire form: `{n, g}`. The squared modulus is recomputed on the way in.
#[derive(Serialize, Deserialize)]
struct PublicKeyRepr {
    #[serde(with = "crate::serialize::b64")]
    n: BigInt,
    #[serde(with = "crate::serialize::b64")]
    g: BigInt,
}

impl From<PublicKey> for PublicKeyRepr {
    fn from(pk: PublicKey) -> Self {
        PublicKeyRepr { n: pk.n, g: pk.g }
    }
}

impl From<PublicKeyRepr> for PublicKey {
    fn from(repr: PublicKeyRepr) -> Self {
        let n_squared = &repr.n * &repr.n;
        PublicKey {
            n: repr.n,
            g: repr.g,
            n_squared,
        }
    }
}

impl PublicKey {
    pub fn new(n: BigInt) -> Self {
        let g = &n + BigInt::one();
        let n_squared = &n * &n;
        PublicKey { n, g, n_squared }
    }

    pub fn n_squared(&self) -> &BigInt {
        &self.n_squared
    }

    /// Encrypt `m`, returning the ciphertext together with the masking
    /// randomness `r` (the membership prover consumes `r`).
    pub fn encrypt(&self, m: &BigInt) -> Result<(BigInt, BigInt), PubKeyError> {
        if m.sign() == Sign::Minus || *m >= self.n {
            return Err(PubKeyError::PlaintextOutOfRange);
        }
        let r = random_unit_mod(&self.n, &mut OsRng)
            .map_err(|err| PubKeyError::RandomNumber(err.to_string()))?;
        let c = self.encrypt_fixed(m, &r)?;
        Ok((c, r))
    }

    /// Encrypt `m` under caller-supplied randomness `r` from `Z*_n`.
    pub fn encrypt_fixed(&self, m: &BigInt, r: &BigInt) -> Result<BigInt, PubKeyError> {
        if m.sign() == Sign::Minus || *m >= self.n {
            return Err(PubKeyError::PlaintextOutOfRange);
        }
        let g_to_m = self.g_pow(m);
        let r_to_n = r.modpow(&self.n, &self.n_squared);
        Ok((g_to_m * r_to_n).mod_floor(&self.n_squared))
    }

    /// `g^m mod n²` through the binomial identity `(n+1)^m ≡ 1 + n·m (mod n²)`.
    pub(crate) fn g_pow(&self, m: &BigInt) -> BigInt {
        (BigInt::one() + &self.n * m).mod_floor(&self.n_squared)
    }

    /// `c · (g^m)⁻¹ mod n²`, using the closed-form inverse `1 − n·m`.
    pub(crate) fn shifted_ciphertext(&self, c: &BigInt, m: &BigInt) -> BigInt {
        let g_to_m_inv = (BigInt::one() - &self.n * m).mod_floor(&self.n_squared);
        (c * g_to_m_inv).mod_floor(&self.n_squared)
    }

    /// Ciphertext of `m1 + m2 mod n`.
    pub fn add_encrypted(&self, c1: &BigInt, c2: &BigInt) -> BigInt {
        (c1 * c2).mod_floor(&self.n_squared)
    }

    /// Ciphertext of `m + k mod n`.
    pub fn add_scalar(&self, c: &BigInt, k: &BigInt) -> BigInt {
        (c * self.g_pow(k)).mod_floor(&self.n_squared)
    }

    /// Ciphertext of `m · k mod n`. The scalar must be non-negative.
    pub fn mul_scalar(&self, c: &BigInt, k: &BigInt) -> BigInt {
        c.modpow(k, &self.n_squared)
    }

    /// Encrypt `m` and attach a proof that it belongs to `valid_set`.
    pub fn encrypt_with_proof(
        &self,
        m: &BigInt,
        valid_set: &[BigInt],
    ) -> Result<(BigInt, MembershipProof), PubKeyError> {
        let (c, r) = self.encrypt(m)?;
        let proof = self.membership_proof(m, &c, &r, valid_set)?;
        Ok((c, proof))
    }

    /// Cramer-Damgård-Schoenmakers OR proof that `c` encrypts one element
    /// of `valid_set`, made non-interactive with Fiat-Shamir.
    ///
    /// `r` is the randomness returned by [`encrypt`](Self::encrypt) for `c`.
    /// Every clause except the real one is simulated; the hash of all
    /// first-round commitments, taken mod `2^256`, binds the challenges.
    pub fn membership_proof(
        &self,
        m: &BigInt,
        c: &BigInt,
        r: &BigInt,
        valid_set: &[BigInt],
    ) -> Result<MembershipProof, PubKeyError> {
        let kappa = valid_set
            .iter()
            .position(|candidate| candidate == m)
            .ok_or(PubKeyError::NotInValidSet)?;
        let k = valid_set.len();

        let omega = random_unit_mod(&self.n, &mut OsRng)
            .map_err(|err| PubKeyError::RandomNumber(err.to_string()))?;

        // Simulator widths: challenges stay below min(p, q), responses below n.
        let sim_e_bits = self.n.bits() as usize / 2 - 1;
        let sim_z_bits = self.n.bits() as usize - 1;

        let mut a = vec![BigInt::zero(); k];
        let mut e = vec![BigInt::zero(); k];
        let mut z = vec![BigInt::zero(); k];

        for (i, m_i) in valid_set.iter().enumerate() {
            if i == kappa {
                a[i] = omega.modpow(&self.n, &self.n_squared);
                continue;
            }
            let u_i = self.shifted_ciphertext(c, m_i);
            let e_i =
                random_int(sim_e_bits).map_err(|err| PubKeyError::RandomNumber(err.to_string()))?;
            let z_i = loop {
                let candidate = random_int(sim_z_bits)
                    .map_err(|err| PubKeyError::RandomNumber(err.to_string()))?;
                if !candidate.is_zero() && candidate.gcd(&self.n).is_one() {
                    break candidate;
                }
            };
            let u_to_e_inv = u_i
                .modpow(&e_i, &self.n_squared)
                .modinv(&self.n_squared)
                .ok_or(PubKeyError::NoInverse)?;
            a[i] = (z_i.modpow(&self.n, &self.n_squared) * u_to_e_inv).mod_floor(&self.n_squared);
            e[i] = e_i;
            z[i] = z_i;
        }

        let commitments: Vec<&BigInt> = a.iter().collect();
        let epsilon = hash_bigints(&commitments);
        let modulus = challenge_modulus();

        // e[kappa] is still zero here, so the full sum covers the simulated clauses.
        let simulated_sum: BigInt = e.iter().sum();
        let e_kappa = (&epsilon - &simulated_sum).mod_floor(&modulus);
        z[kappa] = (&omega * r.modpow(&e_kappa, &self.n)).mod_floor(&self.n);
        e[kappa] = e_kappa;

        Ok(MembershipProof { a, e, z })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::KeyPair;

    fn test_key_pair() -> KeyPair {
        // 23 * 29: small enough to keep tests instant, with gcd(n, λ) = 1.
        KeyPair::from_primes(BigInt::from(23u32), BigInt::from(29u32)).unwrap()
    }

    #[test]
    fn test_encrypt_rejects_out_of_range() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;

        let too_large = pk.n.clone();
        assert!(matches!(
            pk.encrypt(&too_large),
            Err(PubKeyError::PlaintextOutOfRange)
        ));

        let negative = BigInt::from(-1i32);
        assert!(matches!(
            pk.encrypt(&negative),
            Err(PubKeyError::PlaintextOutOfRange)
        ));
    }

    #[test]
    fn test_encrypt_ciphertext_in_range() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let (c, r) = pk.encrypt(&BigInt::from(42u32)).unwrap();
        assert!(c >= BigInt::zero());
        assert!(c < *pk.n_squared());
        assert!(r > BigInt::zero());
        assert!(r < pk.n);
    }

    #[test]
    fn test_encrypt_fixed_deterministic() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let m = BigInt::from(42u32);
        let r = BigInt::from(101u32);
        let c1 = pk.encrypt_fixed(&m, &r).unwrap();
        let c2 = pk.encrypt_fixed(&m, &r).unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_g_pow_matches_modpow() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        for m in [0u32, 1, 42, 600] {
            let m = BigInt::from(m);
            let closed = pk.g_pow(&m);
            let generic = pk.g.modpow(&m, pk.n_squared());
            assert_eq!(closed, generic, "closed form diverges at m = {}", m);
        }
    }

    #[test]
    fn test_shifted_ciphertext_cancels_plaintext() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let sk = &kp.priv_key;
        let m = BigInt::from(42u32);
        let (c, _) = pk.encrypt(&m).unwrap();
        // Dividing out g^m leaves an encryption of zero.
        let u = pk.shifted_ciphertext(&c, &m);
        assert_eq!(sk.decrypt(&u, pk).unwrap(), BigInt::zero());
    }

    #[test]
    fn test_homomorphic_add() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let sk = &kp.priv_key;
        let (c1, _) = pk.encrypt(&BigInt::from(42u32)).unwrap();
        let (c2, _) = pk.encrypt(&BigInt::from(58u32)).unwrap();
        let sum = pk.add_encrypted(&c1, &c2);
        assert!(sum < *pk.n_squared());
        assert_eq!(sk.decrypt(&sum, pk).unwrap(), BigInt::from(100u32));
    }

    #[test]
    fn test_homomorphic_add_wraps_mod_n() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let sk = &kp.priv_key;
        let m1 = &pk.n - BigInt::one();
        let (c1, _) = pk.encrypt(&m1).unwrap();
        let (c2, _) = pk.encrypt(&BigInt::from(2u32)).unwrap();
        let sum = pk.add_encrypted(&c1, &c2);
        assert_eq!(sk.decrypt(&sum, pk).unwrap(), BigInt::one());
    }

    #[test]
    fn test_add_scalar() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let sk = &kp.priv_key;
        let (c, _) = pk.encrypt(&BigInt::from(42u32)).unwrap();
        let shifted = pk.add_scalar(&c, &BigInt::from(8u32));
        assert_eq!(sk.decrypt(&shifted, pk).unwrap(), BigInt::from(50u32));
    }

    #[test]
    fn test_mul_scalar() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let sk = &kp.priv_key;
        let (c, _) = pk.encrypt(&BigInt::from(42u32)).unwrap();
        let scaled = pk.mul_scalar(&c, &BigInt::from(3u32));
        assert_eq!(sk.decrypt(&scaled, pk).unwrap(), BigInt::from(126u32));
    }

    #[test]
    fn test_membership_proof_rejects_non_member() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid: Vec<BigInt> = [1u32, 2, 3].iter().map(|&v| BigInt::from(v)).collect();
        let result = pk.encrypt_with_proof(&BigInt::from(4u32), &valid);
        assert!(matches!(result, Err(PubKeyError::NotInValidSet)));
    }

    #[test]
    fn test_membership_proof_shape() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid: Vec<BigInt> = [1u32, 2, 3].iter().map(|&v| BigInt::from(v)).collect();
        let (_, proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        assert_eq!(proof.a.len(), 3);
        assert_eq!(proof.e.len(), 3);
        assert_eq!(proof.z.len(), 3);
    }
}
