use thiserror::Error;

/// Failure kinds of a single key derivation.
///
/// None of them is retried internally: a derivation either yields a key of
/// exactly the requested length or one of these errors, never a partial key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdfError {
    /// The algorithm id has no digest behind it (e.g. the reserved RIPEMD-160 id).
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The digest provider reported a failure for well-formed input.
    #[error("digest computation failed: {0}")]
    DigestComputationFailed(String),

    /// The round type is not one of simple, salted or iterated.
    #[error("invalid round type: {0}")]
    InvalidRoundType(String),

    /// Malformed caller input, such as bad base64 at the boundary.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}
