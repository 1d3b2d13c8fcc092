use std::fmt;
use std::str::FromStr;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use tracing::debug;
use zeroize::Zeroize;

use super::{MD5_LEN, SHA1_LEN, SHA224_LEN, SHA256_LEN, SHA384_LEN, SHA512_LEN};
use crate::error::KdfError;

/// Hash algorithms addressable by their OpenPGP identifier.
///
/// `Ripemd160` keeps its id reserved but has no digest behind it; every
/// attempt to hash with it fails with [`KdfError::UnsupportedAlgorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Ripemd160,
    Sha256,
    Sha384,
    Sha512,
    Sha224,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 7] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Ripemd160,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha224,
    ];

    /// Looks up an algorithm by OpenPGP id.
    pub fn from_id(id: u8) -> Result<Self, KdfError> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.id() == id)
            .ok_or_else(|| KdfError::UnsupportedAlgorithm(format!("id {id}")))
    }

    pub const fn id(self) -> u8 {
        match self {
            HashAlgorithm::Md5 => 1,
            HashAlgorithm::Sha1 => 2,
            HashAlgorithm::Ripemd160 => 3,
            HashAlgorithm::Sha256 => 8,
            HashAlgorithm::Sha384 => 9,
            HashAlgorithm::Sha512 => 10,
            HashAlgorithm::Sha224 => 11,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Ripemd160 => "ripemd160",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha224 => "sha224",
        }
    }

    /// Fixed output length, or `None` when the algorithm is unsupported.
    pub const fn digest_len(self) -> Option<usize> {
        match self {
            HashAlgorithm::Md5 => Some(MD5_LEN),
            HashAlgorithm::Sha1 => Some(SHA1_LEN),
            HashAlgorithm::Ripemd160 => None,
            HashAlgorithm::Sha256 => Some(SHA256_LEN),
            HashAlgorithm::Sha384 => Some(SHA384_LEN),
            HashAlgorithm::Sha512 => Some(SHA512_LEN),
            HashAlgorithm::Sha224 => Some(SHA224_LEN),
        }
    }

    pub const fn is_supported(self) -> bool {
        self.digest_len().is_some()
    }

    pub(crate) fn unsupported(self) -> KdfError {
        KdfError::UnsupportedAlgorithm(self.name().to_string())
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = KdfError;

    /// Accepts names (`sha256`, `SHA-256`, `sha_256`) or numeric OpenPGP ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return Self::from_id(id);
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == normalized)
            .ok_or_else(|| KdfError::UnsupportedAlgorithm(trimmed.to_string()))
    }
}

/// Source of raw digests.
///
/// Implementations compute one fixed-length digest per call and keep no state
/// between calls that would need synchronization by the stretcher.
pub trait DigestProvider {
    fn digest(&self, algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>, KdfError>;
}

/// In-process provider backed by the RustCrypto hash crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareDigest;

impl DigestProvider for SoftwareDigest {
    fn digest(&self, algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>, KdfError> {
        let out = match algorithm {
            HashAlgorithm::Md5 => fixed_digest::<Md5>(data),
            HashAlgorithm::Sha1 => fixed_digest::<Sha1>(data),
            HashAlgorithm::Sha224 => fixed_digest::<Sha224>(data),
            HashAlgorithm::Sha256 => fixed_digest::<Sha256>(data),
            HashAlgorithm::Sha384 => fixed_digest::<Sha384>(data),
            HashAlgorithm::Sha512 => fixed_digest::<Sha512>(data),
            HashAlgorithm::Ripemd160 => return Err(algorithm.unsupported()),
        };
        Ok(out)
    }
}

fn fixed_digest<D: Digest>(data: &[u8]) -> Vec<u8> {
    let mut out = D::digest(data);
    take_wiped(&mut out)
}

/// Copy a digest off the stack and wipe the original.
fn take_wiped(src: &mut [u8]) -> Vec<u8> {
    let bytes = src.to_vec();
    src.zeroize();
    bytes
}

/// Hash `data` with the built-in software provider.
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>, KdfError> {
    dispatch(&SoftwareDigest, algorithm, data)
}

/// Route one digest request through `provider`.
///
/// Unsupported algorithms never reach the provider, and a digest of the
/// wrong length is treated as a provider failure.
pub(crate) fn dispatch<P>(
    provider: &P,
    algorithm: HashAlgorithm,
    data: &[u8],
) -> Result<Vec<u8>, KdfError>
where
    P: DigestProvider + ?Sized,
{
    let expected = algorithm.digest_len().ok_or_else(|| algorithm.unsupported())?;

    debug!(algorithm = algorithm.name(), input_len = data.len(), "hash");
    let out = provider.digest(algorithm, data)?;

    if out.len() != expected {
        return Err(KdfError::DigestComputationFailed(format!(
            "{algorithm} produced {} bytes, expected {expected}",
            out.len()
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn hex_digest(alg: HashAlgorithm, data: &[u8]) -> String {
        hex::encode(digest(alg, data).unwrap())
    }

    #[test]
    fn digest_lengths_match_algorithm() {
        for alg in HashAlgorithm::ALL {
            match alg.digest_len() {
                Some(len) => assert_eq!(digest(alg, b"data").unwrap().len(), len),
                None => assert!(digest(alg, b"data").is_err()),
            }
        }
        assert_eq!(digest(HashAlgorithm::Sha224, b"").unwrap().len(), 28);
        assert_eq!(digest(HashAlgorithm::Sha512, b"").unwrap().len(), 64);
    }

    #[test]
    fn known_abc_vectors() {
        assert_eq!(
            hex_digest(HashAlgorithm::Md5, b"abc"),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Sha224, b"abc"),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Sha384, b"abc"),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded163\
             1a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Sha512, b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn digest_copy_leaves_source_wiped() {
        let mut block = [0xA5u8; SHA1_LEN];
        let copied = take_wiped(&mut block);

        assert_eq!(copied, vec![0xA5u8; SHA1_LEN]);
        assert_eq!(block, [0u8; SHA1_LEN]);
    }

    #[test]
    fn empty_input_md5() {
        assert_eq!(
            hex_digest(HashAlgorithm::Md5, b""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn ripemd_is_unsupported_not_empty() {
        let err = digest(HashAlgorithm::Ripemd160, b"abc").unwrap_err();
        assert_eq!(err, KdfError::UnsupportedAlgorithm("ripemd160".into()));
    }

    #[test]
    fn unsupported_algorithm_never_reaches_provider() {
        struct Counting(Cell<usize>);
        impl DigestProvider for Counting {
            fn digest(&self, _: HashAlgorithm, _: &[u8]) -> Result<Vec<u8>, KdfError> {
                self.0.set(self.0.get() + 1);
                Ok(vec![0; 20])
            }
        }

        let provider = Counting(Cell::new(0));
        assert!(dispatch(&provider, HashAlgorithm::Ripemd160, b"x").is_err());
        assert_eq!(provider.0.get(), 0);
    }

    #[test]
    fn wrong_length_from_provider_fails() {
        struct Short;
        impl DigestProvider for Short {
            fn digest(&self, _: HashAlgorithm, _: &[u8]) -> Result<Vec<u8>, KdfError> {
                Ok(Vec::new())
            }
        }

        assert!(matches!(
            dispatch(&Short, HashAlgorithm::Sha256, b"x"),
            Err(KdfError::DigestComputationFailed(_))
        ));
    }

    #[test]
    fn ids_round_trip_and_unknown_ids_fail() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(HashAlgorithm::from_id(alg.id()).unwrap(), alg);
        }
        assert!(matches!(
            HashAlgorithm::from_id(4),
            Err(KdfError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn parse_names_and_ids() {
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("sha_1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!("11".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha224);
        assert!("whirlpool".parse::<HashAlgorithm>().is_err());
    }
}
