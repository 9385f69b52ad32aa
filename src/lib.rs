//! Privacy-preserving ballot aggregation over the Paillier cryptosystem.
//!
//! Based on:
//! [Paillier, 1999](https://link.springer.com/chapter/10.1007/3-540-48910-X_16)
//! for the additively homomorphic encryption, and
//! [Cramer, Damgård and Schoenmakers, 1994](https://link.springer.com/chapter/10.1007/3-540-48658-5_19)
//! for the OR-composed set-membership proof, made non-interactive with the
//! Fiat-Shamir transform (SHA-256).
//!
//! Votes are encoded as positional bit fields (`encoding`), encrypted with
//! an attached membership proof, summed ciphertext-by-ciphertext, and the
//! decrypted sum's fields are the per-choice tallies.
//!
//! # Example
//! ```no_run
//! use ballot_paillier::{encoding, KeyPair};
//!
//! let kp = KeyPair::new(256).unwrap();
//! let valid = encoding::single_choice_permutations(3, 8, 0).unwrap();
//! let ballot = encoding::encode_single(1, 3, 8, 0, 0).unwrap();
//! let (c, proof) = kp.pub_key.encrypt_with_proof(&ballot, &valid).unwrap();
//! assert!(proof.verify(&kp.pub_key, &c, &valid).unwrap());
//! let tally = kp.priv_key.decrypt(&c, &kp.pub_key).unwrap();
//! assert_eq!(encoding::decode(&tally, 3, 8).unwrap(), vec![0, 1, 0]);
//! ```

pub mod encoding;
pub mod functions;
pub mod hash;
pub mod keygen;
pub mod priv_key;
pub mod pub_key;
pub mod serialize;
pub mod signature;
pub mod zk_proof;

pub use keygen::KeyPair;
pub use priv_key::PrivateKey;
pub use pub_key::PublicKey;
pub use signature::Signature;
pub use zk_proof::MembershipProof;
