//! Rendering of derived keys and digests for the command line.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::crypto::{HashAlgorithm, KdfParams};
use crate::encoding::{encode_b64, encode_hex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Base64,
    Hex,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Base64 => "base64",
            OutputFormat::Hex => "hex",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" | "b64" => Ok(OutputFormat::Base64),
            "hex" => Ok(OutputFormat::Hex),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format: {other}"),
        }
    }
}

/// Summary of one derivation, as printed by `--format json`.
#[derive(Debug, Serialize)]
pub struct KeyReport {
    algorithm: &'static str,
    algorithm_id: u8,
    round: &'static str,
    cost: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterated_bytes: Option<usize>,
    length: usize,
    key: String,
}

impl KeyReport {
    pub fn new(key: &[u8], params: &KdfParams) -> Self {
        Self {
            algorithm: params.algorithm().name(),
            algorithm_id: params.algorithm().id(),
            round: params.round_type().as_str(),
            cost: params.cost(),
            iterated_bytes: params.iterated_len(),
            length: key.len(),
            key: encode_b64(key),
        }
    }
}

impl Drop for KeyReport {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.key.zeroize();
    }
}

#[derive(Debug, Serialize)]
struct DigestReport {
    algorithm: &'static str,
    algorithm_id: u8,
    digest: String,
}

fn encode(bytes: &[u8], format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Base64 => Some(encode_b64(bytes)),
        OutputFormat::Hex => Some(encode_hex(bytes)),
        OutputFormat::Json => None,
    }
}

/// Render a derived key.
pub fn render_key(
    key: &[u8],
    params: &KdfParams,
    format: OutputFormat,
) -> Result<Zeroizing<String>> {
    let text = match encode(key, format) {
        Some(text) => text,
        None => serde_json::to_string_pretty(&KeyReport::new(key, params))?,
    };
    Ok(Zeroizing::new(text))
}

/// Render a plain digest.
pub fn render_digest(
    algorithm: HashAlgorithm,
    digest: &[u8],
    format: OutputFormat,
) -> Result<String> {
    match encode(digest, format) {
        Some(text) => Ok(text),
        None => Ok(serde_json::to_string_pretty(&DigestReport {
            algorithm: algorithm.name(),
            algorithm_id: algorithm.id(),
            digest: encode_hex(digest),
        })?),
    }
}

/// Render random bytes; JSON wraps them as `{"bytes": "<base64>"}`.
pub fn render_bytes(bytes: &[u8], format: OutputFormat) -> Result<String> {
    match encode(bytes, format) {
        Some(text) => Ok(text),
        None => Ok(serde_json::json!({ "bytes": encode_b64(bytes) }).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::RoundType;

    #[test]
    fn parses_formats() {
        assert_eq!("hex".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert_eq!("B64".parse::<OutputFormat>().unwrap(), OutputFormat::Base64);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn json_report_for_iterated_includes_byte_count() {
        let params = KdfParams::default();
        let text = render_key(&[1, 2, 3], &params, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["algorithm"], "sha256");
        assert_eq!(value["algorithm_id"], 8);
        assert_eq!(value["round"], "iterated");
        assert_eq!(value["iterated_bytes"], 65536);
        assert_eq!(value["length"], 3);
        assert_eq!(value["key"], "AQID");
    }

    #[test]
    fn json_report_omits_byte_count_for_salted() {
        let params = KdfParams::new(HashAlgorithm::Md5, RoundType::Salted, 0).unwrap();
        let text = render_key(&[0xff], &params, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("iterated_bytes").is_none());
    }

    #[test]
    fn digest_renders_hex() {
        let text = render_digest(HashAlgorithm::Sha1, &[0xde, 0xad], OutputFormat::Hex).unwrap();
        assert_eq!(text, "dead");
    }
}
