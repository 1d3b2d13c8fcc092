//! Passphrase stretching in the style of OpenPGP string-to-key.
//!
//! A passphrase and salt are hashed in one or more rounds (simple, salted or
//! iterated) with MD5, SHA-1 or a SHA-2 digest, and the round outputs are
//! concatenated into a key of any requested length.

pub mod crypto;
pub mod encoding;
mod error;
pub mod output;

pub use crate::crypto::{
    DerivedKey, DigestProvider, HashAlgorithm, KdfParams, RoundType, SoftwareDigest, derive_key,
    derive_key_with, digest, expand_cost, round,
};
pub use crate::error::KdfError;

/// Derive a key from a base64 passphrase and base64 salt.
///
/// Both inputs are decoded before stretching; the decoded bytes live in
/// zeroizing buffers and are wiped on every return path.
pub fn derive_key_b64(
    passphrase_b64: &str,
    salt_b64: &str,
    num_bytes: usize,
    algorithm: HashAlgorithm,
    round_type: RoundType,
    cost: u8,
) -> Result<DerivedKey, KdfError> {
    let params = KdfParams::new(algorithm, round_type, cost)?;
    let passphrase = encoding::decode_b64("passphrase", passphrase_b64)?;
    let salt = encoding::decode_b64("salt", salt_b64)?;

    derive_key(&passphrase, &salt, num_bytes, &params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b64_entry_point_matches_raw_derivation() {
        let params = KdfParams::new(HashAlgorithm::Sha512, RoundType::Iterated, 0x20).unwrap();
        let raw = derive_key(b"pass", b"saltsalt", 80, &params).unwrap();
        let b64 = derive_key_b64(
            "cGFzcw==",
            "c2FsdHNhbHQ=",
            80,
            HashAlgorithm::Sha512,
            RoundType::Iterated,
            0x20,
        )
        .unwrap();

        assert_eq!(raw, b64);
    }

    #[test]
    fn md5_simple_pass_scenario() {
        let key =
            derive_key_b64("cGFzcw==", "", 16, HashAlgorithm::Md5, RoundType::Simple, 0).unwrap();
        assert_eq!(*key, digest(HashAlgorithm::Md5, b"pass").unwrap());
    }

    #[test]
    fn malformed_base64_is_invalid_parameters() {
        let err = derive_key_b64("%%%", "", 16, HashAlgorithm::Sha1, RoundType::Simple, 0)
            .unwrap_err();
        assert!(matches!(err, KdfError::InvalidParameters(_)));
    }

    #[test]
    fn unsupported_algorithm_checked_before_decoding() {
        let err = derive_key_b64("%%%", "", 16, HashAlgorithm::Ripemd160, RoundType::Simple, 0)
            .unwrap_err();
        assert!(matches!(err, KdfError::UnsupportedAlgorithm(_)));
    }
}
