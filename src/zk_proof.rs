use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::{challenge_modulus, hash_bigints};
use crate::pub_key::PublicKey;

#[derive(Error, Debug)]
pub enum ZKProofError {
    #[error("commitment arrays must each have length {expected}, got a={a} e={e} z={z}")]
    MalformedCommitment {
        expected: usize,
        a: usize,
        e: usize,
        z: usize,
    },
}

/// Non-interactive OR proof that a ciphertext encrypts one element of a
/// declared plaintext set, without revealing which.
///
/// Produced by [`PublicKey::membership_proof`](crate::pub_key::PublicKey::membership_proof);
/// the three arrays share the valid set's length and index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProof {
    #[serde(with = "crate::serialize::b64_seq")]
    pub a: Vec<BigInt>,
    #[serde(with = "crate::serialize::b64_seq")]
    pub e: Vec<BigInt>,
    #[serde(with = "crate::serialize::b64_seq")]
    pub z: Vec<BigInt>,
}

impl MembershipProof {
    /// Check the proof against `c` and `valid_set`, which must be the
    /// exact sequence the prover declared, in the same order.
    ///
    /// Returns `Ok(false)` for proofs that are well-formed but do not
    /// check out; only a commitment whose array lengths disagree with the
    /// valid set is an error.
    pub fn verify(
        &self,
        pk: &PublicKey,
        c: &BigInt,
        valid_set: &[BigInt],
    ) -> Result<bool, ZKProofError> {
        let k = valid_set.len();
        if self.a.len() != k || self.e.len() != k || self.z.len() != k {
            return Err(ZKProofError::MalformedCommitment {
                expected: k,
                a: self.a.len(),
                e: self.e.len(),
                z: self.z.len(),
            });
        }

        // Negative components cannot arise from an honest prover; fail closed
        // rather than feed them to the exponentiation below.
        let negative = self
            .a
            .iter()
            .chain(self.e.iter())
            .chain(self.z.iter())
            .any(|v| v.sign() == Sign::Minus);
        if negative {
            return Ok(false);
        }

        // The challenges must re-split the hash of the commitments.
        let commitments: Vec<&BigInt> = self.a.iter().collect();
        let epsilon = hash_bigints(&commitments);
        let challenge_sum: BigInt = self.e.iter().sum();
        if challenge_sum.mod_floor(&challenge_modulus()) != epsilon {
            return Ok(false);
        }

        let n_squared = pk.n_squared();
        for i in 0..k {
            let u_i = pk.shifted_ciphertext(c, &valid_set[i]);
            let lhs = self.z[i].modpow(&pk.n, n_squared);
            let rhs = (&self.a[i] * u_i.modpow(&self.e[i], n_squared)).mod_floor(n_squared);
            if lhs != rhs {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::KeyPair;
    use num_traits::One;

    fn test_key_pair() -> KeyPair {
        KeyPair::from_primes(BigInt::from(65521u32), BigInt::from(65519u32)).unwrap()
    }

    fn valid_set() -> Vec<BigInt> {
        [1u32, 2, 3].iter().map(|&v| BigInt::from(v)).collect()
    }

    #[test]
    fn test_good_proof_verifies() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        let (c, proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        assert!(proof.verify(pk, &c, &valid).unwrap());
    }

    #[test]
    fn test_proof_for_each_member() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        for m in &valid {
            let (c, proof) = pk.encrypt_with_proof(m, &valid).unwrap();
            assert!(proof.verify(pk, &c, &valid).unwrap(), "member {} failed", m);
        }
    }

    #[test]
    fn test_degenerate_single_element_set() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = vec![BigInt::from(7u32)];
        let (c, proof) = pk.encrypt_with_proof(&BigInt::from(7u32), &valid).unwrap();
        assert!(proof.verify(pk, &c, &valid).unwrap());
    }

    #[test]
    fn test_substituted_ciphertext_fails() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        let (_, proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        let (other_c, _) = pk.encrypt(&BigInt::from(4u32)).unwrap();
        assert!(!proof.verify(pk, &other_c, &valid).unwrap());
    }

    #[test]
    fn test_substituted_member_ciphertext_fails() {
        // A proof made for one member must not transfer to a ciphertext of
        // another member.
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        let (_, proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        let (other_member, _) = pk.encrypt(&BigInt::from(3u32)).unwrap();
        assert!(!proof.verify(pk, &other_member, &valid).unwrap());
    }

    #[test]
    fn test_reordered_valid_set_fails() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        let (c, proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        let reordered: Vec<BigInt> = [3u32, 2, 1].iter().map(|&v| BigInt::from(v)).collect();
        assert!(!proof.verify(pk, &c, &reordered).unwrap());
    }

    #[test]
    fn test_tampered_challenge_fails() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        let (c, mut proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        proof.e[0] += BigInt::one();
        assert!(!proof.verify(pk, &c, &valid).unwrap());
    }

    #[test]
    fn test_negative_component_fails_closed() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        let (c, mut proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        proof.e[1] = BigInt::from(-5i32);
        assert!(!proof.verify(pk, &c, &valid).unwrap());
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let kp = test_key_pair();
        let pk = &kp.pub_key;
        let valid = valid_set();
        let (c, mut proof) = pk.encrypt_with_proof(&BigInt::from(2u32), &valid).unwrap();
        proof.z.pop();
        assert!(matches!(
            proof.verify(pk, &c, &valid),
            Err(ZKProofError::MalformedCommitment {
                expected: 3,
                a: 3,
                e: 3,
                z: 2
            })
        ));
    }
}
