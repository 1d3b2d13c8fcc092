//! Base64 and hex transcoding at the edges of a derivation.
//!
//! The stretcher itself only ever sees decoded bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use crate::error::KdfError;

/// Decode standard base64; `label` names the field in the error message.
pub fn decode_b64(label: &str, input: &str) -> Result<Zeroizing<Vec<u8>>, KdfError> {
    STANDARD
        .decode(input.trim())
        .map(Zeroizing::new)
        .map_err(|e| KdfError::InvalidParameters(format!("{label} is not valid base64: {e}")))
}

pub fn encode_b64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
