use serde::Deserialize;
use thiserror::Error;

use crate::codec::{self, CodecError};

use super::OrderEvent;

/// Errors raised while unwrapping a trigger envelope. All are fatal.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("event not as expected: {0}")]
    MalformedEnvelope(&'static str),

    #[error("record data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("record data is not a valid order event: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<CodecError> for DecodeError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Base64(e) => DecodeError::Base64(e),
            CodecError::Json(e) => DecodeError::Payload(e),
        }
    }
}

/// Stream trigger payload: `{ "Records": [ { "kinesis": { "data": "..." } } ] }`
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Records", default)]
    pub records: Vec<StreamRecord>,
}

#[derive(Debug, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "kinesis")]
    pub stream: Option<StreamData>,
    #[serde(rename = "eventID")]
    pub event_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StreamData {
    /// Base64-encoded JSON order event
    pub data: Option<String>,
    #[serde(rename = "partitionKey")]
    pub partition_key: Option<String>,
}

/// Unwrap the first record of an envelope into an [`OrderEvent`].
pub fn decode_envelope(envelope: &serde_json::Value) -> Result<OrderEvent, DecodeError> {
    if !envelope.is_object() {
        return Err(DecodeError::MalformedEnvelope("envelope is not an object"));
    }

    let envelope = Envelope::deserialize(envelope)
        .map_err(|_| DecodeError::MalformedEnvelope("unrecognised envelope shape"))?;

    let record = envelope
        .records
        .first()
        .ok_or(DecodeError::MalformedEnvelope("no records"))?;

    if envelope.records.len() > 1 {
        tracing::warn!(
            records = envelope.records.len(),
            "Envelope carries several records, only the first is processed"
        );
    }

    let data = record
        .stream
        .as_ref()
        .ok_or(DecodeError::MalformedEnvelope("record has no stream data"))?
        .data
        .as_deref()
        .ok_or(DecodeError::MalformedEnvelope("stream data is empty"))?;

    tracing::debug!(
        event_id = record.event_id.as_deref().unwrap_or("-"),
        "Decoding stream record"
    );

    Ok(codec::decode_base64_json(data)?)
}
