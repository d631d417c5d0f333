//! Codec trait and JSON implementation

use checkout_bridge_core::CheckoutError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors raised while moving host calls and events across the boundary
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error: {0}")]
    Decode(String),

    /// Well-formed JSON with an unexpected shape
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

impl CodecError {
    /// Whether the failure came from reading host input
    pub fn is_decode(&self) -> bool {
        matches!(self, CodecError::Decode(_) | CodecError::InvalidFormat(_))
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Decode(err.to_string())
        } else {
            CodecError::Encode(err.to_string())
        }
    }
}

impl From<CodecError> for CheckoutError {
    fn from(err: CodecError) -> Self {
        CheckoutError::Internal(err.to_string())
    }
}

/// Encoding of host calls and events
pub trait Codec: Send + Sync {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;

    fn content_type(&self) -> &'static str;
}

/// JSON codec over serde_json
///
/// Compact by default. The CLI uses the pretty form for `check` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Encode a value as one JSON string (one line unless pretty)
    pub fn encode_string<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn decode_str<T: DeserializeOwned>(&self, data: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Decode into a generic JSON value, treating empty input as `null`
    pub fn decode_value(&self, data: &[u8]) -> Result<serde_json::Value, CodecError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        self.decode(data)
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

#[cfg(test)]
#[path = "codec/codec_tests.rs"]
mod codec_tests;
