//! Cryptographic primitives for key stretching.
//!
//! Provides digest dispatch, the stretching loop and OS randomness.

pub mod digest;
pub mod kdf;
pub mod random;

pub use digest::{DigestProvider, HashAlgorithm, SoftwareDigest, digest};
pub use kdf::{
    DerivedKey, KdfParams, MAX_ITERATED_LEN, RoundType, derive_key, derive_key_with, expand_cost,
    round,
};
pub use random::{generate_salt, random_bytes};

/// Length of an MD5 digest (16 bytes).
pub const MD5_LEN: usize = 16;
/// Length of a SHA-1 digest (20 bytes).
pub const SHA1_LEN: usize = 20;
/// Length of a SHA-224 digest (28 bytes).
pub const SHA224_LEN: usize = 28;
/// Length of a SHA-256 digest (32 bytes).
pub const SHA256_LEN: usize = 32;
/// Length of a SHA-384 digest (48 bytes).
pub const SHA384_LEN: usize = 48;
/// Length of a SHA-512 digest (64 bytes).
pub const SHA512_LEN: usize = 64;
/// Length of a generated salt (8 bytes, the OpenPGP S2K salt size).
pub const SALT_LEN: usize = 8;
/// Exponent bias of the iterated cost encoding.
pub const EXP_BIAS: u32 = 6;
