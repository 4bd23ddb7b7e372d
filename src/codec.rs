//! Base64-wrapped JSON decoding shared by the event decoder and the
//! template fetcher.
//!
//! Both upstreams hand us standard-alphabet base64. Stream records are
//! sometimes unpadded and repository file content is wrapped at 60 columns,
//! so padding is optional and ASCII whitespace is dropped before decoding.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::de::DeserializeOwned;
use thiserror::Error;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode base64 text into raw bytes, ignoring embedded whitespace.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    LENIENT.decode(compact)
}

/// Decode base64 text and parse the result as JSON.
pub fn decode_base64_json<T: DeserializeOwned>(encoded: &str) -> Result<T, CodecError> {
    let bytes = decode_base64(encoded)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Standard padded base64, used for outbound credentials.
pub fn encode_base64(raw: impl AsRef<[u8]>) -> String {
    base64::engine::general_purpose::STANDARD.encode(raw)
}
