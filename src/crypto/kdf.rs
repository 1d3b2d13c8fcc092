use std::fmt;
use std::str::FromStr;

use tracing::debug;
use zeroize::Zeroizing;

use super::EXP_BIAS;
use super::digest::{DigestProvider, HashAlgorithm, SoftwareDigest, dispatch};
use crate::error::KdfError;

/// Derived key material; wiped from memory on drop.
pub type DerivedKey = Zeroizing<Vec<u8>>;

/// Expand a one-byte cost into the number of bytes hashed by an iterated round.
///
/// The low nibble picks a base of 16..=31, the high nibble a power-of-two
/// shift starting at `2^6`. This is a byte count, not an iteration count.
///
/// An iterated round holds `prefix || expand_cost(cost)` bytes of secret
/// material in memory at once, up to [`MAX_ITERATED_LEN`] (about 62 MiB) for
/// cost `0xFF`, and rebuilds it for every round. Callers deriving long keys
/// with high costs should bound `cost` before calling.
pub const fn expand_cost(cost: u8) -> usize {
    (16 + (cost & 0x0F) as usize) << ((cost >> 4) as u32 + EXP_BIAS)
}

/// Largest input an iterated round ever hashes, excluding the round prefix.
pub const MAX_ITERATED_LEN: usize = expand_cost(u8::MAX);

/// How the input of each round is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundType {
    /// `prefix || passphrase`
    Simple,
    /// `prefix || salt || passphrase`
    Salted,
    /// `prefix || (salt || passphrase)*` cut to `expand_cost(cost)` bytes
    #[default]
    Iterated,
}

impl RoundType {
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundType::Simple => "simple",
            RoundType::Salted => "salted",
            RoundType::Iterated => "iterated",
        }
    }

    /// Maps an OpenPGP S2K specifier byte (0, 1 or 3) to a round type.
    pub fn from_specifier(specifier: u8) -> Result<Self, KdfError> {
        match specifier {
            0 => Ok(RoundType::Simple),
            1 => Ok(RoundType::Salted),
            3 => Ok(RoundType::Iterated),
            other => Err(KdfError::InvalidRoundType(format!("specifier {other}"))),
        }
    }

    /// Build the digest input of one round.
    pub fn assemble(
        self,
        prefix: &[u8],
        passphrase: &[u8],
        salt: &[u8],
        cost: u8,
    ) -> Result<Zeroizing<Vec<u8>>, KdfError> {
        match self {
            RoundType::Simple => Ok(concat(&[prefix, passphrase])),
            RoundType::Salted => Ok(concat(&[prefix, salt, passphrase])),
            RoundType::Iterated => {
                let count = expand_cost(cost);
                let material = concat(&[salt, passphrase]);
                if material.is_empty() {
                    return Err(KdfError::InvalidParameters(
                        "iterated round needs a non-empty salt or passphrase".into(),
                    ));
                }

                let mut input = Zeroizing::new(Vec::with_capacity(prefix.len() + count));
                input.extend_from_slice(prefix);
                input.extend(material.iter().cycle().take(count));
                Ok(input)
            }
        }
    }
}

fn concat(parts: &[&[u8]]) -> Zeroizing<Vec<u8>> {
    let mut buf = Zeroizing::new(Vec::with_capacity(parts.iter().map(|p| p.len()).sum()));
    for part in parts {
        buf.extend_from_slice(part);
    }
    buf
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundType {
    type Err = KdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(RoundType::Simple),
            "salted" => Ok(RoundType::Salted),
            "iterated" => Ok(RoundType::Iterated),
            _ => Err(KdfError::InvalidRoundType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    algorithm: HashAlgorithm,
    round_type: RoundType,
    cost: u8,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            round_type: RoundType::Iterated,
            // 65536 bytes per round
            cost: 96,
        }
    }
}

impl KdfParams {
    pub fn new(
        algorithm: HashAlgorithm,
        round_type: RoundType,
        cost: u8,
    ) -> Result<Self, KdfError> {
        let params = Self {
            algorithm,
            round_type,
            cost,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn cost(&self) -> u8 {
        self.cost
    }

    /// Bytes hashed per iterated round, `None` for the other round types.
    pub fn iterated_len(&self) -> Option<usize> {
        match self.round_type {
            RoundType::Iterated => Some(expand_cost(self.cost)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), KdfError> {
        if !self.algorithm.is_supported() {
            return Err(self.algorithm.unsupported());
        }
        Ok(())
    }
}

/// Run a single stretching round and return its digest.
pub fn round<P>(
    provider: &P,
    prefix: &[u8],
    passphrase: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<Vec<u8>>, KdfError>
where
    P: DigestProvider + ?Sized,
{
    debug!(
        round = params.round_type.as_str(),
        prefix_len = prefix.len(),
        "round"
    );
    let input = params
        .round_type
        .assemble(prefix, passphrase, salt, params.cost)?;
    dispatch(provider, params.algorithm, &input).map(Zeroizing::new)
}

/// Stretch `passphrase` and `salt` into `num_bytes` of key material using
/// the built-in digest provider.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    num_bytes: usize,
    params: &KdfParams,
) -> Result<DerivedKey, KdfError> {
    derive_key_with(&SoftwareDigest, passphrase, salt, num_bytes, params)
}

/// Stretch `passphrase` and `salt` into `num_bytes` of key material.
///
/// Round outputs are concatenated until enough bytes exist, then the result
/// is cut to `num_bytes`. Each round after the first hashes one more leading
/// zero byte so successive rounds differ. Any failing round fails the whole
/// derivation.
pub fn derive_key_with<P>(
    provider: &P,
    passphrase: &[u8],
    salt: &[u8],
    num_bytes: usize,
    params: &KdfParams,
) -> Result<DerivedKey, KdfError>
where
    P: DigestProvider + ?Sized,
{
    params.validate()?;
    if num_bytes == 0 {
        return Ok(Zeroizing::new(Vec::new()));
    }

    let digest_len = params
        .algorithm
        .digest_len()
        .ok_or_else(|| params.algorithm.unsupported())?;
    let rounds = num_bytes.div_ceil(digest_len);

    // sized up front so the secret never gets reallocated
    let mut result = Zeroizing::new(Vec::with_capacity(rounds * digest_len));
    let mut prefix = Zeroizing::new(Vec::with_capacity(rounds));

    while result.len() < num_bytes {
        let output = round(provider, &prefix, passphrase, salt, params)?;
        result.extend_from_slice(&output);
        prefix.push(0);
    }
    result.truncate(num_bytes);

    debug!(
        algorithm = params.algorithm.name(),
        round = params.round_type.as_str(),
        rounds,
        num_bytes,
        "key derived"
    );
    Ok(result)
}
